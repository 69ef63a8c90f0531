//! DOM plumbing for the bridge.
//!
//! Rendering the canvas into its container, positioning a dragged element,
//! the custom stylesheet block, and moving layout files in and out of the
//! browser.

use pb_core::emitter::{emit_element, emit_loose, write_px};
use pb_core::{Canvas, CanvasNode, NodeIndex, Position, StyleBlock};
use pb_editor::ExportedLayout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, Node};

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Look up the canvas container by id.
pub fn canvas_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {id:?}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

// ─── Canvas rendering ────────────────────────────────────────────────────

/// DOM elements standing for the canvas's draggable nodes.
#[derive(Debug, Default)]
pub struct RenderedCanvas {
    elements: Vec<(Element, NodeIndex)>,
}

impl RenderedCanvas {
    pub fn index_of(&self, element: &Element) -> Option<NodeIndex> {
        let node: &Node = element.as_ref();
        self.elements
            .iter()
            .find(|(rendered, _)| rendered.is_same_node(Some(node)))
            .map(|(_, index)| *index)
    }

    pub fn element(&self, index: NodeIndex) -> Option<&Element> {
        self.elements
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(element, _)| element)
    }
}

/// Replace the container's children with the canvas, node by node, keeping
/// track of which DOM element each draggable node became.
pub fn render(container: &HtmlElement, canvas: &Canvas) -> Result<RenderedCanvas, JsValue> {
    container.set_inner_html("");
    let mut rendered = RenderedCanvas::default();
    let mut markup = String::new();
    for (i, node) in canvas.nodes().iter().enumerate() {
        markup.clear();
        match node {
            CanvasNode::Markup(chunk) => {
                container.insert_adjacent_html("beforeend", chunk)?;
                continue;
            }
            CanvasNode::Element(element) => emit_element(&mut markup, element),
            CanvasNode::Loose(loose) => emit_loose(&mut markup, loose),
        }
        container.insert_adjacent_html("beforeend", &markup)?;
        if let Some(child) = container.last_element_child() {
            rendered.elements.push((child, NodeIndex::new(i)));
        }
    }
    log::trace!("rendered {} nodes", canvas.len());
    Ok(rendered)
}

/// Walk up from an event target to the container's direct child.
pub fn direct_child(container: &HtmlElement, target: Option<EventTarget>) -> Option<Element> {
    let container: &Node = container.as_ref();
    let mut node: Node = target?.dyn_into().ok()?;
    loop {
        let parent = node.parent_node()?;
        if parent.is_same_node(Some(container)) {
            return node.dyn_into().ok();
        }
        node = parent;
    }
}

/// Move a rendered element without re-rendering the canvas.
pub fn place(element: &Element, position: Position) -> Result<(), JsValue> {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return Ok(());
    };
    let style = element.style();
    let mut px = String::new();
    write_px(&mut px, position.top);
    style.set_property("top", &px)?;
    px.clear();
    write_px(&mut px, position.left);
    style.set_property("left", &px)
}

// ─── Stylesheet ──────────────────────────────────────────────────────────

/// Mirror a style block into the live document head.
pub fn apply_style_block(document: &Document, block: &StyleBlock) -> Result<(), JsValue> {
    let Some(id) = block.id.as_deref() else {
        return Ok(());
    };
    let style = match document.get_element_by_id(id) {
        Some(existing) => existing,
        None => document.create_element("style")?,
    };
    style.set_id(id);
    style.set_inner_html(&block.css);
    // Appending an attached node moves it to the end of the head.
    document
        .head()
        .ok_or_else(|| JsValue::from_str("no document head"))?
        .append_child(&style)?;
    Ok(())
}

// ─── Files ───────────────────────────────────────────────────────────────

/// Offer an exported layout as a file download.
pub fn download(document: &Document, layout: &ExportedLayout) -> Result<(), JsValue> {
    let blob_parts = js_sys::Array::new();
    blob_parts.push(&JsValue::from_str(&layout.contents));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&layout.mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let link = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    link.set_href(&url);
    link.set_download(&layout.file_name);
    link.click();

    web_sys::Url::revoke_object_url(&url).ok();
    log::info!(
        "exported {} ({} bytes)",
        layout.file_name,
        layout.contents.len()
    );
    Ok(())
}

/// Read a file as text and hand it to `on_text`. A failed read never calls
/// `on_text`.
pub fn read_text_file(
    file: &web_sys::File,
    on_text: impl FnOnce(String) + 'static,
) -> Result<(), JsValue> {
    let reader = web_sys::FileReader::new()?;
    let reader_clone = reader.clone();
    let file_name = file.name();

    let onload = Closure::once(Box::new(move |_event: web_sys::Event| {
        match reader_clone.result().ok().and_then(|result| result.as_string()) {
            Some(text) => on_text(text),
            None => log::warn!("{file_name} did not read as text"),
        }
    }) as Box<dyn FnOnce(_)>);
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    reader.read_as_text(file)
}
