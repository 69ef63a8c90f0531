//! WASM bridge for the page builder: exposes the editor session to the page.
//!
//! Compiled via `wasm-pack build --target web`. The host page constructs a
//! `PageBuilder` from its JSON config, calls `attach()` once the DOM is
//! ready, and binds its own controls to `undo`, `redo`, `export_layout`,
//! `import_layout` and `apply_custom_css`.

mod dom;

use dom::RenderedCanvas;
use pb_core::{BuilderConfig, CanvasNode, Content, NodeIndex, emit_canvas, parse_canvas};
use pb_editor::{CanvasOffset, EditorSession, InputEvent};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DragEvent, Element, EventTarget, HtmlElement, MouseEvent};

/// State shared between the `PageBuilder` handle and its event closures.
struct Shared {
    session: EditorSession,
    container: HtmlElement,
    rendered: RenderedCanvas,
}

impl Shared {
    fn render(&mut self) -> Result<(), JsValue> {
        self.rendered = dom::render(&self.container, self.session.canvas())?;
        Ok(())
    }
}

/// The main WASM-facing builder controller.
///
/// Owns one editor session bound to one canvas container. All interaction
/// from the page goes through this struct or the listeners `attach` wires.
#[wasm_bindgen]
pub struct PageBuilder {
    shared: Rc<RefCell<Shared>>,
    document: Document,
    attached: bool,
}

#[wasm_bindgen]
impl PageBuilder {
    /// Create a builder from a JSON config (`""` for defaults). The empty
    /// canvas becomes the first snapshot.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<PageBuilder, JsValue> {
        console_error_panic_hook_setup();
        let config = BuilderConfig::from_json(config_json).map_err(to_js)?;
        log::set_max_level(config.log_level());

        let document = dom::document()?;
        let container = dom::canvas_element(&document, &config.canvas_id)?;
        log::info!("page builder bound to #{}", config.canvas_id);

        let shared = Shared {
            session: EditorSession::new(config),
            container,
            rendered: RenderedCanvas::default(),
        };
        Ok(Self {
            shared: Rc::new(RefCell::new(shared)),
            document,
            attached: false,
        })
    }

    /// Wire palette, canvas and document listeners. Calling it again does
    /// nothing.
    pub fn attach(&mut self) -> Result<(), JsValue> {
        if self.attached {
            return Ok(());
        }
        self.wire_palette()?;
        self.wire_canvas()?;
        self.wire_document()?;
        self.shared.borrow_mut().render()?;
        self.attached = true;
        Ok(())
    }

    /// Undo the last recorded action. Returns `false` if there was none.
    pub fn undo(&self) -> Result<bool, JsValue> {
        let mut shared = self.shared.borrow_mut();
        let changed = shared.session.undo();
        if changed {
            shared.render()?;
        }
        Ok(changed)
    }

    /// Redo the last undone action. Returns `false` if there was none.
    pub fn redo(&self) -> Result<bool, JsValue> {
        let mut shared = self.shared.borrow_mut();
        let changed = shared.session.redo();
        if changed {
            shared.render()?;
        }
        Ok(changed)
    }

    /// Replace the page's custom stylesheet.
    pub fn apply_custom_css(&self, css: &str) -> Result<(), JsValue> {
        let mut shared = self.shared.borrow_mut();
        let block = shared.session.apply_custom_css(css);
        dom::apply_style_block(&self.document, block)
    }

    /// Download the canvas markup as a layout file.
    pub fn export_layout(&self) -> Result<(), JsValue> {
        let layout = self.shared.borrow().session.export_layout();
        dom::download(&self.document, &layout)
    }

    /// Read a layout file and replace the canvas with it once loaded.
    pub fn import_layout(&self, file: web_sys::File) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        dom::read_text_file(&file, move |text| {
            let mut shared = shared.borrow_mut();
            shared.session.import_layout(&text);
            if let Err(err) = shared.render() {
                log::error!("import render failed: {err:?}");
            }
        })
    }

    /// Replace the canvas with markup directly (no file involved).
    pub fn import_markup(&self, markup: &str) -> Result<(), JsValue> {
        let mut shared = self.shared.borrow_mut();
        shared.session.import_layout(markup);
        shared.render()
    }

    /// Get the current canvas markup, exactly as a snapshot would record it.
    pub fn get_html(&self) -> String {
        self.shared.borrow().session.serialize()
    }

    /// Undo/redo stack sizes as JSON:
    /// `{"undo":n,"redo":m,"canUndo":bool,"canRedo":bool}`.
    pub fn get_history_json(&self) -> String {
        let shared = self.shared.borrow();
        let history = shared.session.history();
        serde_json::json!({
            "undo": history.undo_len(),
            "redo": history.redo_len(),
            "canUndo": history.can_undo(),
            "canRedo": history.can_redo(),
        })
        .to_string()
    }
}

// ─── Listener wiring ─────────────────────────────────────────────────────

impl PageBuilder {
    fn wire_palette(&self) -> Result<(), JsValue> {
        let (selector, data_attr, payload_key) = {
            let shared = self.shared.borrow();
            let config = shared.session.config();
            (
                format!(".{}", config.palette_class),
                format!("data-{}", config.palette_data_key),
                config.drag_payload_key.clone(),
            )
        };

        let items = self.document.query_selector_all(&selector)?;
        log::debug!("wiring {} palette items", items.length());
        for i in 0..items.length() {
            let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };

            let shared = Rc::clone(&self.shared);
            let source = item.clone();
            let data_attr = data_attr.clone();
            let payload_key = payload_key.clone();
            listen(&item, "dragstart", move |event: DragEvent| {
                let kind_tag = source.get_attribute(&data_attr).unwrap_or_default();
                if let Some(transfer) = event.data_transfer() {
                    transfer.set_data(&payload_key, &kind_tag).ok();
                }
                dispatch(&shared, &InputEvent::DragStart { kind_tag }, None);
            })?;

            let shared = Rc::clone(&self.shared);
            listen(&item, "dragend", move |_: DragEvent| {
                dispatch(&shared, &InputEvent::DragEnd, None);
            })?;
        }
        Ok(())
    }

    fn wire_canvas(&self) -> Result<(), JsValue> {
        let container = self.shared.borrow().container.clone();

        let shared = Rc::clone(&self.shared);
        listen(&container, "dragover", move |event: DragEvent| {
            event.prevent_default();
            dispatch(&shared, &InputEvent::DragOver, None);
        })?;

        let shared = Rc::clone(&self.shared);
        listen(&container, "drop", move |event: DragEvent| {
            event.prevent_default();
            {
                let mut shared = shared.borrow_mut();
                let offset = CanvasOffset::new(
                    shared.container.offset_left() as f32,
                    shared.container.offset_top() as f32,
                );
                shared.session.set_canvas_offset(offset);
            }
            let drop = InputEvent::Drop {
                x: event.client_x() as f32,
                y: event.client_y() as f32,
            };
            dispatch(&shared, &drop, None);
        })?;

        let shared = Rc::clone(&self.shared);
        listen(&container, "mousedown", move |event: MouseEvent| {
            let target = {
                let shared = shared.borrow();
                dom::direct_child(&shared.container, event.target())
                    .and_then(|child| shared.rendered.index_of(&child))
            };
            let down = InputEvent::PointerDown {
                x: event.client_x() as f32,
                y: event.client_y() as f32,
            };
            dispatch(&shared, &down, target);
        })?;

        let shared = Rc::clone(&self.shared);
        listen(&container, "dblclick", move |event: MouseEvent| {
            if let Err(err) = edit_inline(&shared, event.target()) {
                log::error!("inline edit failed: {err:?}");
            }
        })?;

        Ok(())
    }

    fn wire_document(&self) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        listen(&self.document, "mousemove", move |event: MouseEvent| {
            let pointer = InputEvent::PointerMove {
                x: event.client_x() as f32,
                y: event.client_y() as f32,
            };
            dispatch(&shared, &pointer, None);
        })?;

        let shared = Rc::clone(&self.shared);
        listen(&self.document, "mouseup", move |event: MouseEvent| {
            let pointer = InputEvent::PointerUp {
                x: event.client_x() as f32,
                y: event.client_y() as f32,
            };
            dispatch(&shared, &pointer, None);
        })?;

        Ok(())
    }
}

// ─── Event handlers ──────────────────────────────────────────────────────

/// Register `handler` for `event` on `target` for the page's lifetime.
fn listen<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Feed an input event to the session and bring the DOM up to date.
fn dispatch(shared: &RefCell<Shared>, event: &InputEvent, target: Option<NodeIndex>) {
    if let Err(err) = apply_input(shared, event, target) {
        log::error!("{event:?} failed: {err:?}");
    }
}

fn apply_input(
    shared: &RefCell<Shared>,
    event: &InputEvent,
    target: Option<NodeIndex>,
) -> Result<(), JsValue> {
    let mut guard = shared.borrow_mut();
    let shared = &mut *guard;
    let outcome = shared.session.handle_input(event, target).map_err(to_js)?;
    if !outcome.changed {
        return Ok(());
    }

    // A move only touches the dragged element's style.
    if let Some(index) = shared.session.dragged()
        && let Some(element) = shared.rendered.element(index)
        && let Some(moved) = shared.session.canvas().element(index)
    {
        return dom::place(element, moved.position);
    }
    shared.render()
}

fn edit_inline(shared: &RefCell<Shared>, target: Option<EventTarget>) -> Result<(), JsValue> {
    let window = dom::window()?;
    let mut guard = shared.borrow_mut();
    let shared = &mut *guard;

    let index = target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|element| shared.rendered.index_of(&element));
    let mut prompt = |message: &str, default: &str| {
        window
            .prompt_with_message_and_default(message, default)
            .ok()
            .flatten()
    };
    if shared.session.edit_inline(index, &mut prompt).map_err(to_js)? {
        shared.render()?;
    }
    Ok(())
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Start-up ────────────────────────────────────────────────────────────

/// Module start: install the panic hook and the console logger. Each
/// builder narrows the level from its own config.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook_setup();
    if console_log::init_with_level(log::Level::Trace).is_err() {
        web_sys::console::warn_1(&"page builder: logger already installed".into());
    }
    log::set_max_level(log::LevelFilter::Info);
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("page builder panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Parse layout markup and describe its nodes as JSON for a layers panel.
/// Returns `{"nodes":[...]}`; markup never fails to parse.
#[wasm_bindgen]
pub fn parse_to_json(markup: &str) -> String {
    let canvas = parse_canvas(markup);
    let nodes: Vec<serde_json::Value> = canvas.nodes().iter().map(describe_node).collect();
    serde_json::json!({ "nodes": nodes }).to_string()
}

/// Rewrite layout markup the way the builder itself would save it.
#[wasm_bindgen]
pub fn normalize_layout(markup: &str) -> String {
    emit_canvas(&parse_canvas(markup))
}

fn describe_node(node: &CanvasNode) -> serde_json::Value {
    let element = match node {
        CanvasNode::Element(element) => element,
        CanvasNode::Loose(loose) => {
            return serde_json::json!({
                "kind": "loose",
                "tag": loose.tag,
                "text": loose.text_content(),
            });
        }
        CanvasNode::Markup(_) => return serde_json::json!({ "kind": "markup" }),
    };
    let mut obj = serde_json::json!({
        "kind": element.kind.as_str(),
        "top": element.position.top,
        "left": element.position.left,
    });
    match &element.content {
        Content::Text(text) => obj["text"] = serde_json::Value::String(text.clone()),
        Content::Image { src, alt } => {
            obj["src"] = serde_json::Value::String(src.clone());
            obj["alt"] = serde_json::Value::String(alt.clone());
        }
        Content::Items(items) => obj["items"] = serde_json::json!(items.as_slice()),
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_to_json_describes_elements_and_markup() {
        let markup = concat!(
            "<h1>Title</h1>",
            r#"<button class="draggable" style="position: absolute; top: 5px; left: 6px;">Go</button>"#,
            r#"<ul class="draggable" style="position: absolute; top: 0px; left: 0px;"><li>a</li><li>b</li></ul>"#,
        );
        let json: serde_json::Value = serde_json::from_str(&parse_to_json(markup)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nodes": [
                    { "kind": "markup" },
                    { "kind": "button", "top": 5.0, "left": 6.0, "text": "Go" },
                    { "kind": "list", "top": 0.0, "left": 0.0, "items": ["a", "b"] },
                ]
            })
        );
    }

    #[test]
    fn hand_written_draggable_is_reported_as_loose() {
        let markup = r#"<p class="draggable note">Remember <em>this</em></p>"#;
        let json: serde_json::Value = serde_json::from_str(&parse_to_json(markup)).unwrap();
        assert_eq!(
            json["nodes"][0],
            serde_json::json!({ "kind": "loose", "tag": "p", "text": "Remember this" })
        );
    }

    #[test]
    fn logo_reports_image_attributes() {
        let markup = r#"<img src="a.png" alt="A" class="draggable" style="position: absolute; top: 1px; left: 2px;">"#;
        let json: serde_json::Value = serde_json::from_str(&parse_to_json(markup)).unwrap();
        assert_eq!(json["nodes"][0]["src"], "a.png");
        assert_eq!(json["nodes"][0]["alt"], "A");
    }

    #[test]
    fn normalize_keeps_builder_markup() {
        let markup = r#"<div class="draggable" style="position: absolute; top: 10px; left: 20px;">Hi</div>"#;
        assert_eq!(normalize_layout(markup), markup);
        assert_eq!(normalize_layout(""), "");
    }
}
