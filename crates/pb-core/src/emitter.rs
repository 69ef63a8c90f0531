//! Emitter: Canvas → markup.
//!
//! Produces exactly what the browser returns from `canvas.innerHTML` for the
//! same tree, so snapshots taken here and snapshots taken from the DOM agree
//! byte for byte. Attribute order follows the order the builder assigns
//! them (a section gets its inline style before its class).

use crate::model::*;
use std::fmt::Write;

/// Serialize the whole canvas.
#[must_use]
pub fn emit_canvas(canvas: &Canvas) -> String {
    let mut out = String::with_capacity(256);
    for node in canvas.nodes() {
        match node {
            CanvasNode::Element(element) => emit_element(&mut out, element),
            CanvasNode::Loose(loose) => emit_loose(&mut out, loose),
            CanvasNode::Markup(markup) => out.push_str(markup),
        }
    }
    out
}

/// Serialize a hand-written draggable: its tags as written around its body.
pub fn emit_loose(out: &mut String, loose: &LooseElement) {
    out.push_str(&loose.open_tag);
    out.push_str(&loose.body);
    out.push_str(&loose.close_tag);
}

/// Serialize one builder element into `out`.
pub fn emit_element(out: &mut String, element: &Element) {
    let tag = element.kind.tag();
    out.push('<');
    out.push_str(tag);

    match element.kind {
        ElementKind::Section => {
            out.push_str(" style=\"");
            out.push_str(SECTION_STYLE);
            out.push(' ');
            emit_position(out, element.position);
            out.push_str("\" class=\"");
            out.push_str(DRAGGABLE_CLASS);
            out.push('"');
        }
        ElementKind::Logo => {
            if let Content::Image { src, alt } = &element.content {
                out.push_str(" src=\"");
                escape_attr(out, src);
                out.push_str("\" alt=\"");
                escape_attr(out, alt);
                out.push('"');
            }
            emit_class_and_style(out, element.position);
        }
        ElementKind::Text | ElementKind::Button | ElementKind::List => {
            emit_class_and_style(out, element.position);
        }
    }
    out.push('>');

    if element.kind.is_void() {
        return;
    }

    match &element.content {
        Content::Text(text) => escape_text(out, text),
        Content::Items(items) => {
            for item in items {
                out.push_str("<li>");
                escape_text(out, item);
                out.push_str("</li>");
            }
        }
        Content::Image { .. } => {}
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn emit_class_and_style(out: &mut String, position: Position) {
    out.push_str(" class=\"");
    out.push_str(DRAGGABLE_CLASS);
    out.push_str("\" style=\"");
    emit_position(out, position);
    out.push('"');
}

fn emit_position(out: &mut String, position: Position) {
    out.push_str("position: absolute; top: ");
    write_px(out, position.top);
    out.push_str("; left: ");
    write_px(out, position.left);
    out.push(';');
}

/// Write a CSS pixel length in its shortest form (`50px`, `12.5px`).
pub fn write_px(out: &mut String, value: f32) {
    // `-0` is not something the DOM ever serializes.
    let value = if value == 0.0 { 0.0 } else { value };
    let _ = write!(out, "{value}px");
}

/// Escape text content the way the DOM serializer does.
pub fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value the way the DOM serializer does.
pub fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
