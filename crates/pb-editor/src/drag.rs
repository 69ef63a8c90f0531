//! Drag controllers.
//!
//! Two independent state machines translate input events into `Command`s:
//!
//! | Controller    | Events                                   | Produces |
//! |---------------|------------------------------------------|----------|
//! | `PaletteDrag` | drag start / over / drop / end           | `CreateElement` |
//! | `MoveTool`    | pointer down / move / up on an element   | `MoveElement`, `FinishMove` |

use crate::commands::Command;
use crate::factory::resolve_kind;
use crate::input::InputEvent;
use pb_core::{Canvas, NodeIndex, Position};
use smallvec::SmallVec;

/// Trait for controllers that turn input into commands.
pub trait DragController {
    /// Handle an input event. `target` is the canvas node under the pointer.
    fn handle(
        &mut self,
        event: &InputEvent,
        target: Option<NodeIndex>,
        canvas: &Canvas,
    ) -> Vec<Command>;
}

// ─── Palette insertion ───────────────────────────────────────────────────

/// Key/value data carried by a native drag, like `DataTransfer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragPayload {
    entries: SmallVec<[(String, String); 2]>,
}

impl DragPayload {
    pub fn set_data(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Missing keys read as the empty string.
    pub fn get_data(&self, key: &str) -> &str {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or("", |(_, v)| v.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct PaletteDrag {
    payload_key: String,
    payload: DragPayload,
}

impl PaletteDrag {
    pub fn new(payload_key: impl Into<String>) -> Self {
        Self {
            payload_key: payload_key.into(),
            payload: DragPayload::default(),
        }
    }

    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }
}

impl DragController for PaletteDrag {
    fn handle(
        &mut self,
        event: &InputEvent,
        _target: Option<NodeIndex>,
        _canvas: &Canvas,
    ) -> Vec<Command> {
        match event {
            InputEvent::DragStart { kind_tag } => {
                self.payload.clear();
                self.payload.set_data(&self.payload_key, kind_tag);
                vec![]
            }
            InputEvent::Drop { x, y } => {
                let tag = self.payload.get_data(&self.payload_key).to_string();
                self.payload.clear();
                match resolve_kind(&tag) {
                    Ok(kind) => vec![Command::CreateElement { kind, x: *x, y: *y }],
                    Err(_) => vec![],
                }
            }
            InputEvent::DragEnd => {
                self.payload.clear();
                vec![]
            }
            _ => vec![],
        }
    }
}

// ─── Free repositioning ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct MoveGesture {
    index: NodeIndex,
    /// Pointer minus element origin, fixed for the whole gesture.
    offset_x: f32,
    offset_y: f32,
    start: Position,
    last: Position,
}

#[derive(Debug, Default)]
pub struct MoveTool {
    gesture: Option<MoveGesture>,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Element being dragged, if any.
    pub fn dragged(&self) -> Option<NodeIndex> {
        self.gesture.map(|g| g.index)
    }

    /// Abandon the gesture without emitting anything (the canvas it pointed
    /// into was replaced).
    pub fn cancel(&mut self) {
        self.gesture = None;
    }
}

impl DragController for MoveTool {
    fn handle(
        &mut self,
        event: &InputEvent,
        target: Option<NodeIndex>,
        canvas: &Canvas,
    ) -> Vec<Command> {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.gesture = target.and_then(|index| {
                    let origin = canvas.element(index)?.position;
                    Some(MoveGesture {
                        index,
                        offset_x: x - origin.left,
                        offset_y: y - origin.top,
                        start: origin,
                        last: origin,
                    })
                });
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                let Some(gesture) = self.gesture.as_mut() else {
                    return vec![];
                };
                // No clamping: elements may leave the visible canvas.
                let left = x - gesture.offset_x;
                let top = y - gesture.offset_y;
                gesture.last = Position::new(left, top);
                vec![Command::MoveElement {
                    index: gesture.index,
                    left,
                    top,
                }]
            }
            InputEvent::PointerUp { .. } => match self.gesture.take() {
                Some(gesture) => vec![Command::FinishMove {
                    index: gesture.index,
                    moved: gesture.last != gesture.start,
                }],
                None => vec![],
            },
            _ => vec![],
        }
    }
}
