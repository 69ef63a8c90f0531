//! Editor session: the single owner of editor state.
//!
//! A session holds the canvas, the document head, the undo/redo history and
//! the interaction controllers. Every mutation goes through
//! [`EditorSession::execute`], which applies the command and then consults
//! its [`SnapshotPolicy`] to decide whether the new canvas is recorded.
//! Sessions are independent of each other; nothing is global.

use crate::commands::{Command, SnapshotPolicy};
use crate::drag::{DragController, MoveTool, PaletteDrag};
use crate::factory::{self, CanvasOffset};
use crate::history::History;
use crate::inline::{InlineEditor, Prompt};
use crate::input::InputEvent;
use crate::porter::{self, ExportedLayout};
use pb_core::{
    BuilderConfig, BuilderError, Canvas, DocumentHead, NodeIndex, Result, StyleBlock, emit_canvas,
    parse_canvas,
};

/// What executing one or more commands did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// The canvas content changed.
    pub changed: bool,
    /// A snapshot was recorded.
    pub snapshot: bool,
    /// Index of a newly created element.
    pub created: Option<NodeIndex>,
}

impl Outcome {
    fn merge(&mut self, other: Outcome) {
        self.changed |= other.changed;
        self.snapshot |= other.snapshot;
        if other.created.is_some() {
            self.created = other.created;
        }
    }
}

pub struct EditorSession {
    canvas: Canvas,
    head: DocumentHead,
    history: History,
    config: BuilderConfig,
    canvas_offset: CanvasOffset,
    palette: PaletteDrag,
    mover: MoveTool,
    inline: InlineEditor,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl EditorSession {
    /// Create a session with an empty canvas. The empty canvas is recorded
    /// as the baseline snapshot.
    pub fn new(config: BuilderConfig) -> Self {
        let mut session = Self {
            canvas: Canvas::new(),
            head: DocumentHead::new(),
            history: History::new(config.history_limit),
            palette: PaletteDrag::new(config.drag_payload_key.clone()),
            mover: MoveTool::new(),
            inline: InlineEditor::new(config.edit_prompt_message.clone()),
            canvas_offset: CanvasOffset::default(),
            config,
        };
        session.save_state();
        session
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn head(&self) -> &DocumentHead {
        &self.head
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn canvas_offset(&self) -> CanvasOffset {
        self.canvas_offset
    }

    /// Record where the canvas sits in the viewport; creation subtracts it
    /// from drop coordinates.
    pub fn set_canvas_offset(&mut self, offset: CanvasOffset) {
        self.canvas_offset = offset;
    }

    /// Element currently being repositioned, if any.
    pub fn dragged(&self) -> Option<NodeIndex> {
        self.mover.dragged()
    }

    /// Serialize the canvas, exactly as a snapshot would.
    pub fn serialize(&self) -> String {
        emit_canvas(&self.canvas)
    }

    /// Push the current canvas onto the undo stack and clear redo.
    pub fn save_state(&mut self) {
        let snapshot = self.serialize();
        log::debug!(
            "snapshot #{} ({} bytes)",
            self.history.undo_len(),
            snapshot.len()
        );
        self.history.save(snapshot);
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Apply one command and record a snapshot if its policy asks for one.
    ///
    /// # Errors
    /// Returns `BuilderError::NoSuchElement` when a command addresses a node
    /// that is not a draggable element. Nothing is changed in that case.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        log::trace!("execute: {}", command.description());
        let policy = command.snapshot_policy();

        let mut outcome = match command {
            Command::CreateElement { kind, x, y } => {
                let element = factory::create_element(kind, x, y, self.canvas_offset);
                let index = self.canvas.push_element(element);
                log::debug!("created {kind} at {index} from pointer ({x}, {y})");
                Outcome {
                    changed: true,
                    created: Some(index),
                    ..Outcome::default()
                }
            }
            Command::MoveElement { index, left, top } => {
                self.element_mut(index)?.move_to(left, top);
                log::trace!("moved {index} to ({left}, {top})");
                Outcome {
                    changed: true,
                    ..Outcome::default()
                }
            }
            Command::FinishMove { index, .. } => {
                self.element_mut(index)?;
                Outcome::default()
            }
            Command::EditText { index, text } => {
                let node = self
                    .canvas
                    .get_mut(index)
                    .filter(|node| node.is_editable())
                    .ok_or(BuilderError::NoSuchElement(index.get()))?;
                match text {
                    Some(text) => {
                        node.set_text_content(text);
                        log::debug!("edited text of {index}");
                        Outcome {
                            changed: true,
                            ..Outcome::default()
                        }
                    }
                    None => Outcome::default(),
                }
            }
            Command::ApplyCss { css } => {
                self.head.apply_custom_css(&self.config.custom_css_id, &css);
                log::debug!("applied {} bytes of custom css", css.len());
                Outcome::default()
            }
            Command::Import { markup } => {
                self.replace_canvas(&markup);
                Outcome {
                    changed: true,
                    ..Outcome::default()
                }
            }
            Command::Undo => Outcome {
                changed: self.undo(),
                ..Outcome::default()
            },
            Command::Redo => Outcome {
                changed: self.redo(),
                ..Outcome::default()
            },
        };

        let record = match policy {
            SnapshotPolicy::Always => true,
            SnapshotPolicy::IfMovesTracked => self.config.snapshot_moves,
            SnapshotPolicy::Never => false,
        };
        if record {
            self.save_state();
            outcome.snapshot = true;
        }
        Ok(outcome)
    }

    /// Route an input event to the matching drag controller and execute the
    /// commands it produces.
    ///
    /// # Errors
    /// Propagates errors from [`EditorSession::execute`].
    pub fn handle_input(&mut self, event: &InputEvent, target: Option<NodeIndex>) -> Result<Outcome> {
        let commands = if event.is_drag_and_drop() {
            self.palette.handle(event, target, &self.canvas)
        } else {
            self.mover.handle(event, target, &self.canvas)
        };

        let mut outcome = Outcome::default();
        for command in commands {
            outcome.merge(self.execute(command)?);
        }
        Ok(outcome)
    }

    // ─── Operations ──────────────────────────────────────────────────────

    /// Create an element from a palette type tag at pointer (`x`, `y`).
    ///
    /// # Errors
    /// Returns `BuilderError::UnsupportedElement` for unknown tags; the
    /// canvas and history are left untouched.
    pub fn create_element(&mut self, tag: &str, x: f32, y: f32) -> Result<NodeIndex> {
        let kind = factory::resolve_kind(tag)?;
        let outcome = self.execute(Command::CreateElement { kind, x, y })?;
        outcome
            .created
            .ok_or_else(|| BuilderError::UnsupportedElement(tag.to_string()))
    }

    /// Reposition an element without recording history.
    ///
    /// # Errors
    /// Returns `BuilderError::NoSuchElement` if `index` is not an element.
    pub fn move_element(&mut self, index: NodeIndex, left: f32, top: f32) -> Result<()> {
        self.execute(Command::MoveElement { index, left, top })?;
        Ok(())
    }

    /// Replace an element's text. `None` (cancelled) changes nothing.
    ///
    /// # Errors
    /// Returns `BuilderError::NoSuchElement` if `index` is not an element.
    pub fn edit_text(&mut self, index: NodeIndex, text: Option<String>) -> Result<bool> {
        Ok(self.execute(Command::EditText { index, text })?.changed)
    }

    /// Double-click handling: prompt for new text for the element at
    /// `target`. Returns whether the canvas changed.
    ///
    /// # Errors
    /// Propagates errors from [`EditorSession::execute`].
    pub fn edit_inline(&mut self, target: Option<NodeIndex>, prompt: &mut dyn Prompt) -> Result<bool> {
        match self.inline.request(&self.canvas, target, prompt) {
            Some(command) => Ok(self.execute(command)?.changed),
            None => Ok(false),
        }
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.serialize();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.canvas = parse_canvas(previous);
        self.mover.cancel();
        log::debug!("undo → {} snapshots left", self.history.undo_len());
        true
    }

    /// Step forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.serialize();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.canvas = parse_canvas(next);
        self.mover.cancel();
        log::debug!("redo → {} redo entries left", self.history.redo_len());
        true
    }

    /// Replace the custom stylesheet block's content.
    pub fn apply_custom_css(&mut self, css: &str) -> &StyleBlock {
        self.head.apply_custom_css(&self.config.custom_css_id, css)
    }

    pub fn export_layout(&self) -> ExportedLayout {
        porter::export_layout(&self.canvas, &self.config)
    }

    /// Replace the canvas with an imported layout and record it.
    pub fn import_layout(&mut self, markup: &str) {
        self.replace_canvas(markup);
        self.save_state();
    }

    fn replace_canvas(&mut self, markup: &str) {
        self.mover.cancel();
        self.canvas = parse_canvas(markup);
        log::debug!("imported layout ({} nodes)", self.canvas.len());
    }

    fn element_mut(&mut self, index: NodeIndex) -> Result<&mut pb_core::Element> {
        self.canvas
            .element_mut(index)
            .ok_or(BuilderError::NoSuchElement(index.get()))
    }
}
