//! Input abstraction layer.
//!
//! Normalizes the browser's native drag-and-drop and mouse events into a
//! single `InputEvent` enum consumed by the drag controllers. Coordinates
//! are viewport pointer coordinates (`clientX` / `clientY`).

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A palette item started dragging; carries its element type tag.
    DragStart { kind_tag: String },

    /// Something is being dragged over the canvas.
    DragOver,

    /// A drag was released over the canvas.
    Drop { x: f32, y: f32 },

    /// A drag ended, dropped or not.
    DragEnd,

    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
}

impl InputEvent {
    /// Extract the pointer position, if the event has one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::Drop { x, y }
            | Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Native drag-and-drop events, as opposed to mouse tracking.
    pub fn is_drag_and_drop(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. } | Self::DragOver | Self::Drop { .. } | Self::DragEnd
        )
    }
}
