//! Element factory: one construction routine per element kind.

use pb_core::model::*;
use pb_core::Result;

/// Offset of the canvas inside the viewport (`offsetLeft` / `offsetTop`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasOffset {
    pub left: f32,
    pub top: f32,
}

impl CanvasOffset {
    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// Resolve a palette type tag, logging tags the builder does not support.
///
/// # Errors
/// Returns `BuilderError::UnsupportedElement` for unknown tags.
pub fn resolve_kind(tag: &str) -> Result<ElementKind> {
    tag.parse::<ElementKind>().inspect_err(|err| log::error!("{err}"))
}

/// Build an element of `kind` at pointer position (`x`, `y`), converted to
/// canvas coordinates by subtracting the canvas offset.
pub fn create_element(kind: ElementKind, x: f32, y: f32, offset: CanvasOffset) -> Element {
    let position = Position::new(x - offset.left, y - offset.top);
    Element::new(kind, position, default_content(kind))
}

/// Fixed placeholder content for each kind.
pub fn default_content(kind: ElementKind) -> Content {
    let construct: fn() -> Content = match kind {
        ElementKind::Text => text,
        ElementKind::Button => button,
        ElementKind::Logo => logo,
        ElementKind::List => list,
        ElementKind::Section => section,
    };
    construct()
}

fn text() -> Content {
    Content::Text(DEFAULT_TEXT.to_string())
}

fn button() -> Content {
    Content::Text(DEFAULT_BUTTON_LABEL.to_string())
}

fn logo() -> Content {
    Content::Image {
        src: DEFAULT_LOGO_SRC.to_string(),
        alt: DEFAULT_LOGO_ALT.to_string(),
    }
}

fn list() -> Content {
    Content::Items(DEFAULT_LIST_ITEMS.iter().map(|item| item.to_string()).collect())
}

fn section() -> Content {
    Content::Text(DEFAULT_SECTION_TEXT.to_string())
}
