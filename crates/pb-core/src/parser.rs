//! Parser for canvas markup → `Canvas`.
//!
//! Built on `winnow` 0.7. Imported layouts are not validated, so parsing
//! never fails: the input is split into top-level chunks (elements with
//! their subtree, comments, text runs, stray end tags) and each chunk
//! becomes a builder [`Element`], a [`LooseElement`] or a verbatim markup
//! fragment.
//! A chunk is only promoted to an `Element` when re-emitting that element
//! reproduces the chunk exactly, which makes
//! `emit_canvas(&parse_canvas(s)) == s` hold for every input.

use crate::emitter::emit_element;
use crate::model::*;
use winnow::ascii::{float, multispace0, multispace1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Parse canvas markup into a `Canvas`. Never fails.
#[must_use]
pub fn parse_canvas(input: &str) -> Canvas {
    let mut canvas = Canvas::new();
    let mut rest = input;

    while !rest.is_empty() {
        let len = if rest.starts_with("<!") {
            comment_extent(rest)
        } else if rest.starts_with("</") {
            end_tag_extent(rest)
        } else if starts_markup(rest) {
            element_extent(rest)
        } else {
            text_extent(rest)
        };

        let (chunk, tail) = rest.split_at(len);
        if let Some(element) = parse_builder_element(chunk) {
            canvas.push_element(element);
        } else if let Some(loose) = parse_loose_element(chunk) {
            canvas.push_loose(loose);
        } else {
            canvas.push_markup(chunk);
        }
        rest = tail;
    }

    canvas
}

// ─── Chunking ────────────────────────────────────────────────────────────

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

fn is_void(name: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Whether `s` opens a tag, an end tag, or a comment-like construct.
fn starts_markup(s: &str) -> bool {
    if s.starts_with("<!") {
        return true;
    }
    s.strip_prefix("</")
        .or_else(|| s.strip_prefix('<'))
        .is_some_and(|t| t.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn text_extent(input: &str) -> usize {
    input
        .char_indices()
        .skip(1)
        .find(|&(i, _)| starts_markup(&input[i..]))
        .map_or(input.len(), |(i, _)| i)
}

/// `<!-- … -->`, or a bogus comment / doctype running to the next `>`.
fn comment_extent(input: &str) -> usize {
    if let Some(body) = input.strip_prefix("<!--") {
        return body.find("-->").map_or(input.len(), |i| 4 + i + 3);
    }
    input.find('>').map_or(input.len(), |i| i + 1)
}

fn end_tag_extent(input: &str) -> usize {
    input.find('>').map_or(input.len(), |i| i + 1)
}

/// Byte length of the element starting at `input`, subtree included.
/// An element that never closes runs to the end of the input.
fn element_extent(input: &str) -> usize {
    let mut rest = input;
    let Ok(open) = parse_open_tag.parse_next(&mut rest) else {
        return input.len();
    };
    if open.self_closing || is_void(open.name) {
        return input.len() - rest.len();
    }

    if is_raw_text(open.name) {
        let close = format!("</{}", open.name.to_ascii_lowercase());
        let lowered = rest.to_ascii_lowercase();
        return match lowered.find(&close) {
            Some(i) => match rest[i..].find('>') {
                Some(j) => input.len() - rest.len() + i + j + 1,
                None => input.len(),
            },
            None => input.len(),
        };
    }

    let mut depth = 1usize;
    while depth > 0 {
        match rest.find('<') {
            Some(i) => rest = &rest[i..],
            None => return input.len(),
        }

        if rest.starts_with("<!") {
            rest = &rest[comment_extent(rest)..];
            continue;
        }

        let mut ahead = rest;
        if rest.starts_with("</") {
            if parse_end_tag.parse_next(&mut ahead).is_ok() {
                depth -= 1;
                rest = ahead;
            } else {
                rest = &rest[1..];
            }
        } else if let Ok(tag) = parse_open_tag.parse_next(&mut ahead) {
            if !tag.self_closing && !is_void(tag.name) {
                depth += 1;
            }
            rest = ahead;
        } else {
            rest = &rest[1..];
        }
    }

    input.len() - rest.len()
}

// ─── Tags ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct OpenTag<'a> {
    name: &'a str,
    attributes: Vec<(&'a str, Option<&'a str>)>,
    self_closing: bool,
}

impl<'a> OpenTag<'a> {
    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| *v)
    }
}

fn parse_tag_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '-' || c == ':'
        }),
    )
        .take()
        .parse_next(input)
}

fn parse_attribute<'a>(input: &mut &'a str) -> ModalResult<(&'a str, Option<&'a str>)> {
    let name = take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '/' | '>' | '=' | '"' | '\'')
    })
    .parse_next(input)?;
    let value = opt(preceded(
        (multispace0, '=', multispace0),
        alt((
            delimited('"', take_till(0.., '"'), '"'),
            delimited('\'', take_till(0.., '\''), '\''),
            take_while(1.., |c: char| !c.is_whitespace() && c != '>'),
        )),
    ))
    .parse_next(input)?;
    Ok((name, value))
}

fn parse_open_tag<'a>(input: &mut &'a str) -> ModalResult<OpenTag<'a>> {
    '<'.parse_next(input)?;
    let name = parse_tag_name.parse_next(input)?;
    let attributes: Vec<_> = repeat(0.., preceded(multispace1, parse_attribute)).parse_next(input)?;
    multispace0.parse_next(input)?;
    let self_closing = opt('/').parse_next(input)?.is_some();
    '>'.parse_next(input)?;
    Ok(OpenTag {
        name,
        attributes,
        self_closing,
    })
}

fn parse_end_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    "</".parse_next(input)?;
    let name = parse_tag_name.parse_next(input)?;
    take_till(0.., '>').parse_next(input)?;
    '>'.parse_next(input)?;
    Ok(name)
}

// ─── Builder elements ────────────────────────────────────────────────────

/// Recognize a chunk the builder itself would have produced.
fn parse_builder_element(chunk: &str) -> Option<Element> {
    let mut rest = chunk;
    let open = parse_open_tag.parse_next(&mut rest).ok()?;
    let style = open.attribute("style")?;

    let kind = match open.name {
        "button" => ElementKind::Button,
        "img" => ElementKind::Logo,
        "ul" => ElementKind::List,
        "div" if style.starts_with(SECTION_STYLE) => ElementKind::Section,
        "div" => ElementKind::Text,
        _ => return None,
    };

    let position_style = match kind {
        ElementKind::Section => style.strip_prefix(SECTION_STYLE)?.strip_prefix(' ')?,
        _ => style,
    };
    let position = parse_position.parse(position_style).ok()?;

    let content = match kind {
        ElementKind::Logo => Content::Image {
            src: unescape(open.attribute("src")?),
            alt: unescape(open.attribute("alt")?),
        },
        ElementKind::List => {
            let body = rest.strip_suffix("</ul>")?;
            if body.starts_with("<li>") {
                let items: Vec<&str> = parse_list_items.parse(body).ok()?;
                Content::Items(items.into_iter().map(unescape).collect())
            } else {
                Content::Text(parse_plain_text(body)?)
            }
        }
        ElementKind::Text | ElementKind::Button | ElementKind::Section => {
            let body = rest
                .strip_suffix('>')
                .and_then(|b| b.strip_suffix(kind.tag()))
                .and_then(|b| b.strip_suffix("</"))?;
            Content::Text(parse_plain_text(body)?)
        }
    };

    let element = Element::new(kind, position, content);
    let mut canonical = String::with_capacity(chunk.len());
    emit_element(&mut canonical, &element);
    (canonical == chunk).then_some(element)
}

/// Recognize any other element carrying the draggable class. Tags are
/// kept as written, so re-emission is exact by construction.
fn parse_loose_element(chunk: &str) -> Option<LooseElement> {
    let mut rest = chunk;
    let open = parse_open_tag.parse_next(&mut rest).ok()?;
    if open.self_closing || is_void(open.name) || is_raw_text(open.name) {
        return None;
    }
    let class = open.attribute("class")?;
    if !class.split_ascii_whitespace().any(|c| c == DRAGGABLE_CLASS) {
        return None;
    }

    let open_len = chunk.len() - rest.len();
    let (body, close_tag) = match rest.rfind("</") {
        Some(i)
            if parse_end_tag
                .parse(&rest[i..])
                .is_ok_and(|name| name.eq_ignore_ascii_case(open.name)) =>
        {
            rest.split_at(i)
        }
        _ => (rest, ""),
    };
    Some(LooseElement {
        tag: open.name.to_ascii_lowercase(),
        open_tag: chunk[..open_len].to_string(),
        body: body.to_string(),
        close_tag: close_tag.to_string(),
    })
}

fn parse_position(input: &mut &str) -> ModalResult<Position> {
    "position: absolute; top: ".parse_next(input)?;
    let top: f32 = float.parse_next(input)?;
    "px; left: ".parse_next(input)?;
    let left: f32 = float.parse_next(input)?;
    "px;".parse_next(input)?;
    Ok(Position { top, left })
}

fn parse_list_items<'a>(input: &mut &'a str) -> ModalResult<Vec<&'a str>> {
    repeat(0.., delimited("<li>", take_till(0.., '<'), "</li>")).parse_next(input)
}

fn parse_plain_text(body: &str) -> Option<String> {
    (!body.contains('<')).then(|| unescape(body))
}

pub(crate) fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::emit_canvas;
    use pretty_assertions::assert_eq;

    const BUTTON: &str =
        r#"<button class="draggable" style="position: absolute; top: 42px; left: 42px;">Click Me</button>"#;

    #[test]
    fn parse_builder_button() {
        let canvas = parse_canvas(BUTTON);
        assert_eq!(canvas.len(), 1);
        let (_, el) = canvas.elements().next().unwrap();
        assert_eq!(el.kind, ElementKind::Button);
        assert_eq!(el.position, Position::new(42.0, 42.0));
        assert_eq!(el.text_content(), "Click Me");
    }

    #[test]
    fn section_is_told_apart_from_text() {
        let input = r#"<div style="border: 1px solid rgb(0, 0, 0); padding: 10px; margin: 10px 0px; position: absolute; top: 1px; left: 2px;" class="draggable">Section</div><div class="draggable" style="position: absolute; top: 3px; left: 4px;">New Text</div>"#;
        let canvas = parse_canvas(input);
        let kinds: Vec<_> = canvas.elements().map(|(_, e)| e.kind).collect();
        assert_eq!(kinds, vec![ElementKind::Section, ElementKind::Text]);
        assert_eq!(emit_canvas(&canvas), input);
    }

    #[test]
    fn list_items_and_edited_list() {
        let items = r#"<ul class="draggable" style="position: absolute; top: 0px; left: 0px;"><li>Item 1</li><li>Item 2</li><li>Item 3</li></ul>"#;
        let edited = r#"<ul class="draggable" style="position: absolute; top: 0px; left: 0px;">Groceries</ul>"#;
        let canvas = parse_canvas(&format!("{items}{edited}"));
        let contents: Vec<_> = canvas.elements().map(|(_, e)| e.content.clone()).collect();
        assert_eq!(contents.len(), 2);
        assert!(matches!(&contents[0], Content::Items(i) if i.len() == 3));
        assert_eq!(contents[1], Content::Text("Groceries".into()));
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let input = r#"<div class="draggable" style="position: absolute; top: 0px; left: 0px;">a &lt;b&gt; &amp; c</div>"#;
        let canvas = parse_canvas(input);
        assert_eq!(canvas.elements().next().unwrap().1.text_content(), "a <b> & c");
        assert_eq!(emit_canvas(&canvas), input);
    }

    #[test]
    fn foreign_markup_is_kept_verbatim() {
        let input = "<p class=x>hello <b>world</b></p>\n<!-- note --><div>plain</div>";
        let canvas = parse_canvas(input);
        assert_eq!(canvas.elements().count(), 0);
        assert_eq!(canvas.len(), 4);
        assert_eq!(emit_canvas(&canvas), input);
    }

    #[test]
    fn near_canonical_element_is_loose() {
        // Extra attribute: the builder never writes `id`.
        let input = r#"<div id="a" class="draggable" style="position: absolute; top: 0px; left: 0px;">x</div>"#;
        let canvas = parse_canvas(input);
        assert_eq!(canvas.elements().count(), 0);
        assert!(matches!(canvas.get(crate::NodeIndex::new(0)), Some(CanvasNode::Loose(_))));
        assert_eq!(emit_canvas(&canvas), input);
    }

    #[test]
    fn hand_written_draggable_keeps_its_tags() {
        let input = "<DIV class='card draggable' style=\"position:absolute;top:5px;left:5px\">Hi <b>there</b></Div >";
        let canvas = parse_canvas(input);
        let Some(CanvasNode::Loose(loose)) = canvas.get(crate::NodeIndex::new(0)) else {
            panic!("expected a loose element, got {:?}", canvas.nodes());
        };
        assert_eq!(loose.tag, "div");
        assert_eq!(loose.body, "Hi <b>there</b>");
        assert_eq!(loose.close_tag, "</Div >");
        assert_eq!(loose.text_content(), "Hi there");
        assert_eq!(emit_canvas(&canvas), input);
    }

    #[test]
    fn unclosed_draggable_has_no_close_tag() {
        let input = r#"<div class="draggable">open <b>inner</b>"#;
        let canvas = parse_canvas(input);
        let Some(CanvasNode::Loose(loose)) = canvas.get(crate::NodeIndex::new(0)) else {
            panic!("expected a loose element");
        };
        assert_eq!(loose.close_tag, "");
        assert_eq!(loose.body, "open <b>inner</b>");
        assert_eq!(emit_canvas(&canvas), input);
    }

    #[test]
    fn class_must_contain_draggable_as_a_word() {
        let canvas = parse_canvas(r#"<div class="undraggable">x</div><img class="draggable" src="a.png">"#);
        assert!(canvas.nodes().iter().all(|n| matches!(n, CanvasNode::Markup(_))));
    }

    #[test]
    fn malformed_input_round_trips() {
        for input in [
            "<div",
            "<div class=\"draggable\"",
            "</span> stray",
            "a < b <<>> c",
            "<ul><li>unterminated",
            "<script>if (a < b) {}</script>tail",
            "<!-- never closed",
            "<br/><img src=x>",
            "ünïcödé <em>ok</em>",
        ] {
            assert_eq!(emit_canvas(&parse_canvas(input)), input, "input: {input:?}");
        }
    }

    #[test]
    fn nested_elements_are_one_chunk() {
        let input = "<section><div><div>deep</div></div></section><span>next</span>";
        let canvas = parse_canvas(input);
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn fractional_and_negative_positions() {
        let input = r#"<button class="draggable" style="position: absolute; top: -12.5px; left: 300.25px;">Click Me</button>"#;
        let canvas = parse_canvas(input);
        let (_, el) = canvas.elements().next().unwrap();
        assert_eq!(el.position, Position::new(300.25, -12.5));
    }
}
