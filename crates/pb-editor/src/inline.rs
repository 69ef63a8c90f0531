//! Inline text editing.
//!
//! A double-click on a draggable element asks the user for replacement
//! text. Asking is synchronous and modal (`window.prompt` in the browser),
//! so it is modelled as a blocking [`Prompt`] call.

use crate::commands::Command;
use pb_core::{Canvas, NodeIndex};

/// Something that can ask the user for a line of text.
pub trait Prompt {
    /// Show `message` with `default` pre-filled. `None` means cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

impl<F> Prompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self(message, default)
    }
}

pub struct InlineEditor {
    message: String,
}

impl InlineEditor {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Prompt for new text for the element at `target`.
    ///
    /// Returns `None` when the double-click did not land on a draggable
    /// element, typed or hand-written. A cancelled prompt still yields an `EditText` command with
    /// no text, which the session treats as a no-op.
    pub fn request(
        &self,
        canvas: &Canvas,
        target: Option<NodeIndex>,
        prompt: &mut dyn Prompt,
    ) -> Option<Command> {
        let index = target?;
        let current = canvas.get(index)?.text_content()?;
        let text = prompt.prompt(&self.message, &current);
        Some(Command::EditText { index, text })
    }
}
