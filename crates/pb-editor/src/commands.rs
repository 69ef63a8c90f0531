//! Editor commands.
//!
//! Every user action becomes a `Command` dispatched through
//! `EditorSession::execute`. The command itself states whether it is
//! recorded in history, so the snapshot decision lives in one place.

use pb_core::{ElementKind, NodeIndex};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an element at pointer coordinates (viewport space).
    CreateElement { kind: ElementKind, x: f32, y: f32 },

    /// Reposition an element; `left` / `top` are canvas-relative.
    MoveElement { index: NodeIndex, left: f32, top: f32 },

    /// Pointer released after a move gesture.
    FinishMove { index: NodeIndex, moved: bool },

    /// Replace an element's text. `None` means the prompt was cancelled.
    EditText {
        index: NodeIndex,
        text: Option<String>,
    },

    ApplyCss { css: String },

    /// Replace the whole canvas with imported markup.
    Import { markup: String },

    Undo,
    Redo,
}

/// Whether executing a command records a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPolicy {
    Always,
    Never,
    /// Only when the session is configured to track moves.
    IfMovesTracked,
}

impl Command {
    pub fn snapshot_policy(&self) -> SnapshotPolicy {
        match self {
            Command::CreateElement { .. } | Command::Import { .. } => SnapshotPolicy::Always,
            Command::EditText { text: Some(_), .. } => SnapshotPolicy::Always,
            Command::FinishMove { moved: true, .. } => SnapshotPolicy::IfMovesTracked,
            Command::EditText { text: None, .. }
            | Command::FinishMove { moved: false, .. }
            | Command::MoveElement { .. }
            | Command::ApplyCss { .. }
            | Command::Undo
            | Command::Redo => SnapshotPolicy::Never,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::CreateElement { .. } => "create element",
            Command::MoveElement { .. } => "move element",
            Command::FinishMove { .. } => "finish move",
            Command::EditText { .. } => "edit text",
            Command::ApplyCss { .. } => "apply custom css",
            Command::Import { .. } => "import layout",
            Command::Undo => "undo",
            Command::Redo => "redo",
        }
    }
}
