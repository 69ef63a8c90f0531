//! Canvas data model.
//!
//! The canvas is an ordered list of top-level nodes. A node is either a
//! typed, draggable [`Element`] placed by the builder, a [`LooseElement`]
//! (a hand-written element that carries the draggable class), or a verbatim
//! [`CanvasNode::Markup`] fragment for anything else that ended up on the
//! canvas (whitespace, comments, foreign tags from an imported file).
//! Keeping foreign content verbatim is what lets any imported file survive
//! a round trip through the model byte for byte.

use crate::emitter::escape_text;
use crate::error::BuilderError;
use crate::id::NodeIndex;
use crate::parser::unescape;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Class carried by every element the builder places on the canvas.
pub const DRAGGABLE_CLASS: &str = "draggable";

/// Inline declarations a section gets before its positioning, written the
/// way the DOM serializes `border: 1px solid #000; margin: 10px 0`.
pub const SECTION_STYLE: &str = "border: 1px solid rgb(0, 0, 0); padding: 10px; margin: 10px 0px;";

pub const DEFAULT_TEXT: &str = "New Text";
pub const DEFAULT_BUTTON_LABEL: &str = "Click Me";
pub const DEFAULT_LOGO_SRC: &str = "https://via.placeholder.com/100";
pub const DEFAULT_LOGO_ALT: &str = "Logo";
pub const DEFAULT_LIST_ITEMS: [&str; 3] = ["Item 1", "Item 2", "Item 3"];
pub const DEFAULT_SECTION_TEXT: &str = "Section";

// ─── Element kinds ───────────────────────────────────────────────────────

/// The closed set of element types the palette offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Button,
    Logo,
    List,
    Section,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Text,
        ElementKind::Button,
        ElementKind::Logo,
        ElementKind::List,
        ElementKind::Section,
    ];

    /// Type tag used by palette items and drag payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Button => "button",
            ElementKind::Logo => "logo",
            ElementKind::List => "list",
            ElementKind::Section => "section",
        }
    }

    /// HTML tag name the element renders as.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Text | ElementKind::Section => "div",
            ElementKind::Button => "button",
            ElementKind::Logo => "img",
            ElementKind::List => "ul",
        }
    }

    /// Void elements never serialize children.
    pub fn is_void(self) -> bool {
        matches!(self, ElementKind::Logo)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BuilderError::UnsupportedElement(s.to_string()))
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Absolute position inside the canvas, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub top: f32,
    pub left: f32,
}

impl Position {
    pub const fn new(left: f32, top: f32) -> Self {
        Self { top, left }
    }
}

/// What an element holds between its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    Text(String),
    /// Image reference; lives in attributes, never in children.
    Image { src: String, alt: String },
    /// `<li>` children of a list.
    Items(SmallVec<[String; 4]>),
}

impl Content {
    /// The DOM `textContent` of this content.
    pub fn text_content(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Image { .. } => String::new(),
            Content::Items(items) => items.concat(),
        }
    }
}

/// A draggable, absolutely positioned element placed by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub position: Position,
    pub content: Content,
}

impl Element {
    pub fn new(kind: ElementKind, position: Position, content: Content) -> Self {
        Self {
            kind,
            position,
            content,
        }
    }

    pub fn text_content(&self) -> String {
        self.content.text_content()
    }

    /// Replace everything inside the element with a single text run, the
    /// way assigning `textContent` does. A void element keeps its content
    /// since its children would never serialize anyway.
    pub fn set_text_content(&mut self, text: String) {
        if self.kind.is_void() {
            return;
        }
        self.content = Content::Text(text);
    }

    pub fn move_to(&mut self, left: f32, top: f32) {
        self.position = Position::new(left, top);
    }
}

// ─── Hand-written draggables ─────────────────────────────────────────────

/// An element with the draggable class that the builder did not write
/// itself, e.g. one typed into an exported file by hand. Its tags stay
/// exactly as written; only the children can be replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LooseElement {
    /// Lowercased tag name.
    pub tag: String,
    pub open_tag: String,
    pub body: String,
    /// Empty when the element never closes.
    pub close_tag: String,
}

impl LooseElement {
    /// The body's text with every tag dropped, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut text = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();
        while let Some(start) = rest.find('<') {
            text.push_str(&rest[..start]);
            rest = rest[start..].find('>').map_or("", |end| &rest[start + end + 1..]);
        }
        text.push_str(rest);
        unescape(&text)
    }

    pub fn set_text_content(&mut self, text: &str) {
        self.body.clear();
        escape_text(&mut self.body, text);
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasNode {
    Element(Element),
    Loose(LooseElement),
    /// Verbatim markup that is not a builder element.
    Markup(String),
}

impl CanvasNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            CanvasNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            CanvasNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Nodes whose text a double-click may replace.
    pub fn is_editable(&self) -> bool {
        !matches!(self, CanvasNode::Markup(_))
    }

    /// `None` for verbatim markup.
    pub fn text_content(&self) -> Option<String> {
        match self {
            CanvasNode::Element(element) => Some(element.text_content()),
            CanvasNode::Loose(loose) => Some(loose.text_content()),
            CanvasNode::Markup(_) => None,
        }
    }

    /// Replace the node's children with `text`. Verbatim markup is left
    /// alone and reports `false`.
    pub fn set_text_content(&mut self, text: String) -> bool {
        match self {
            CanvasNode::Element(element) => element.set_text_content(text),
            CanvasNode::Loose(loose) => loose.set_text_content(&text),
            CanvasNode::Markup(_) => return false,
        }
        true
    }
}

/// The editable surface: every user-placed element in paint order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Canvas {
    nodes: Vec<CanvasNode>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn get(&self, index: NodeIndex) -> Option<&CanvasNode> {
        self.nodes.get(index.get())
    }

    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut CanvasNode> {
        self.nodes.get_mut(index.get())
    }

    pub fn element(&self, index: NodeIndex) -> Option<&Element> {
        self.get(index).and_then(CanvasNode::as_element)
    }

    pub fn element_mut(&mut self, index: NodeIndex) -> Option<&mut Element> {
        self.nodes
            .get_mut(index.get())
            .and_then(CanvasNode::as_element_mut)
    }

    /// Iterate over the draggable elements together with their positions.
    pub fn elements(&self) -> impl Iterator<Item = (NodeIndex, &Element)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.as_element().map(|e| (NodeIndex::new(i), e)))
    }

    /// Append an element as the last child.
    pub fn push_element(&mut self, element: Element) -> NodeIndex {
        self.nodes.push(CanvasNode::Element(element));
        NodeIndex::new(self.nodes.len() - 1)
    }

    pub fn push_loose(&mut self, loose: LooseElement) -> NodeIndex {
        self.nodes.push(CanvasNode::Loose(loose));
        NodeIndex::new(self.nodes.len() - 1)
    }

    /// Append verbatim markup. Adjacent fragments are kept separate so that
    /// node positions keep matching the parsed structure.
    pub fn push_markup(&mut self, markup: impl Into<String>) -> NodeIndex {
        self.nodes.push(CanvasNode::Markup(markup.into()));
        NodeIndex::new(self.nodes.len() - 1)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_parse_back() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let err = "video".parse::<ElementKind>().unwrap_err();
        assert!(matches!(err, BuilderError::UnsupportedElement(ref t) if t == "video"));
        // Tags are case-sensitive, like the palette metadata they come from.
        assert!("Text".parse::<ElementKind>().is_err());
        assert!("".parse::<ElementKind>().is_err());
    }

    #[test]
    fn list_text_content_concatenates_items() {
        let content = Content::Items(DEFAULT_LIST_ITEMS.iter().map(|s| s.to_string()).collect());
        assert_eq!(content.text_content(), "Item 1Item 2Item 3");
    }

    #[test]
    fn set_text_replaces_list_items() {
        let mut list = Element::new(
            ElementKind::List,
            Position::default(),
            Content::Items(smallvec::smallvec!["a".to_string()]),
        );
        list.set_text_content("plain".to_string());
        assert_eq!(list.content, Content::Text("plain".to_string()));
    }

    #[test]
    fn set_text_on_void_element_is_ignored() {
        let mut logo = Element::new(
            ElementKind::Logo,
            Position::default(),
            Content::Image {
                src: DEFAULT_LOGO_SRC.to_string(),
                alt: DEFAULT_LOGO_ALT.to_string(),
            },
        );
        logo.set_text_content("caption".to_string());
        assert!(matches!(logo.content, Content::Image { .. }));
        assert_eq!(logo.text_content(), "");
    }

    #[test]
    fn elements_skip_markup_nodes() {
        let mut canvas = Canvas::new();
        canvas.push_markup("\n");
        let idx = canvas.push_element(Element::new(
            ElementKind::Text,
            Position::new(1.0, 2.0),
            Content::Text("x".into()),
        ));
        let found: Vec<_> = canvas.elements().map(|(i, _)| i).collect();
        assert_eq!(found, vec![idx]);
        assert_eq!(idx.get(), 1);
        assert!(canvas.element(NodeIndex::new(0)).is_none());
    }

    fn loose(body: &str) -> LooseElement {
        LooseElement {
            tag: "div".into(),
            open_tag: r#"<div class="draggable card">"#.into(),
            body: body.into(),
            close_tag: "</div>".into(),
        }
    }

    #[test]
    fn loose_text_content_drops_tags() {
        let card = loose("Hello <b>big</b> &amp; <i>bold</i> world");
        assert_eq!(card.text_content(), "Hello big & bold world");
    }

    #[test]
    fn loose_set_text_escapes_and_keeps_tags() {
        let mut node = CanvasNode::Loose(loose("<b>old</b>"));
        assert!(node.set_text_content("a < b".into()));
        let CanvasNode::Loose(card) = &node else {
            panic!("node kind changed");
        };
        assert_eq!(card.body, "a &lt; b");
        assert_eq!(card.open_tag, r#"<div class="draggable card">"#);
        assert_eq!(node.text_content().as_deref(), Some("a < b"));
    }

    #[test]
    fn markup_is_not_editable() {
        let mut node = CanvasNode::Markup("<p>x</p>".into());
        assert!(!node.is_editable());
        assert!(!node.set_text_content("y".into()));
        assert_eq!(node.text_content(), None);
    }
}
