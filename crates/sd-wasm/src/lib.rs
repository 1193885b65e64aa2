//! WASM bridge for SD: exposes the editor session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>`, forwards DOM events, and redraws whenever a call reports a
//! change.

mod canvas2d;

use canvas2d::{BlitCache, Canvas2dSurface};
use kurbo::{Point, Size, Vec2};
use sd_core::config::EditorConfig;
use sd_core::id::ComponentId;
use sd_core::model::{ComponentKind, ComponentPatch, ComponentType, PlacedComponent, PropertyValue};
use sd_core::templates::{BLANK_TEMPLATE_ID, DEVICE_TEMPLATES};
use sd_editor::library;
use sd_editor::{Command, EditorSession, InputEvent, Modifiers, PointerButton};
use sd_render::theme::ThemeMode;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The WASM-facing editor controller.
///
/// Owns one [`EditorSession`]. Every call that can change what is on
/// screen returns whether the host should redraw.
#[wasm_bindgen]
pub struct SurfaceDesigner {
    session: EditorSession,
    blits: BlitCache,
}

#[wasm_bindgen]
impl SurfaceDesigner {
    /// Create a controller for a drawing surface of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_session(EditorSession::default(), width, height)
    }

    /// Like `new`, with an `EditorConfig` given as JSON.
    pub fn with_config(
        width: f64,
        height: f64,
        config_json: &str,
    ) -> Result<SurfaceDesigner, JsError> {
        let config = EditorConfig::from_json(config_json)?;
        Ok(Self::with_session(EditorSession::new(config), width, height))
    }

    /// Paint the current state to a Canvas2D context.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) {
        let mut surface = Canvas2dSurface::new(ctx, &mut self.blits);
        self.session.render(&mut surface);
    }

    /// Report a new surface size. Re-centres the canvas when `center` is set.
    pub fn resize(&mut self, width: f64, height: f64, center: bool) -> bool {
        self.session.resize_viewport(Size::new(width, height), center)
    }

    // ─── Pointer & wheel ─────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle_event(&InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
            modifiers: Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
        })
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle_event(&InputEvent::PointerMove {
            x,
            y,
            modifiers: Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
        })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_event(&InputEvent::up(x, y))
    }

    pub fn handle_wheel(&mut self, delta_y: f64) -> bool {
        self.session.handle_event(&InputEvent::Wheel { delta_y })
    }

    /// CSS cursor for the canvas element.
    pub fn get_cursor(&self) -> String {
        self.session.cursor().as_css().to_string()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press. Returns JSON `{"changed":bool,"selectedId":"…"}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        text_input_focused: bool,
    ) -> String {
        let changed = self.session.handle_event(&InputEvent::KeyDown {
            key: key.to_string(),
            modifiers: Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
            text_input_focused,
        });
        json!({ "changed": changed, "selectedId": self.get_selected_id() }).to_string()
    }

    pub fn handle_key_up(&mut self, key: &str) -> bool {
        self.session.handle_event(&InputEvent::KeyUp {
            key: key.to_string(),
        })
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.dispatch(Command::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.dispatch(Command::Redo)
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn zoom_in(&mut self) -> bool {
        self.session.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.session.zoom_out()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.dispatch(Command::SetZoom(zoom))
    }

    pub fn get_zoom_percent(&self) -> u32 {
        self.session.zoom_percent()
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(Command::SetPan(Vec2::new(x, y)))
    }

    pub fn center_canvas(&mut self) -> bool {
        self.dispatch(Command::CenterCanvas)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    // ─── Library ─────────────────────────────────────────────────────────

    /// Library entries matching `term`, as JSON `[{"type","label"}]`.
    pub fn library_items(&self, term: &str) -> String {
        let items: Vec<Value> = library::search(term)
            .map(|item| json!({ "type": item.component_type.as_str(), "label": item.label }))
            .collect();
        Value::Array(items).to_string()
    }

    /// Add a component of `kind` at the default position.
    /// Returns the new id, or an empty string if `kind` is unknown.
    pub fn add_component(&mut self, kind: &str) -> String {
        let Some(ty) = ComponentType::parse(kind) else {
            log::warn!("unknown component type `{kind}`");
            return String::new();
        };
        match self.session.add_from_library(ty) {
            Ok(id) => id.to_string(),
            Err(e) => {
                log::warn!("add failed: {e}");
                String::new()
            }
        }
    }

    /// Drop a library item at a surface position.
    pub fn drop_component(&mut self, kind: &str, x: f64, y: f64) -> String {
        let Some(ty) = ComponentType::parse(kind) else {
            log::warn!("unknown component type `{kind}`");
            return String::new();
        };
        match self.session.drop_from_library(ty, Point::new(x, y)) {
            Ok(id) => id.to_string(),
            Err(e) => {
                log::warn!("drop failed: {e}");
                String::new()
            }
        }
    }

    // ─── Selection & properties ──────────────────────────────────────────

    /// Select a component by id; an empty id clears the selection.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        let selection = (!id.is_empty()).then(|| ComponentId::intern(id));
        self.dispatch(Command::SelectComponent(selection))
    }

    pub fn get_selected_id(&self) -> String {
        self.session
            .selection()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// The selected component as JSON, or `null`.
    pub fn get_selected_props(&self) -> String {
        match self.session.selected_component() {
            Some(c) => component_json(c).to_string(),
            None => "null".to_string(),
        }
    }

    /// Set one field of the selected component. `x`, `y`, `width` and
    /// `height` update the frame; any other key is a kind property.
    /// `value_json` is a JSON string, number or boolean.
    pub fn set_selected_prop(&mut self, key: &str, value_json: &str) -> bool {
        let Some(id) = self.session.selection() else {
            return false;
        };
        let value: PropertyValue = match serde_json::from_str(value_json) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("bad value for `{key}`: {e}");
                return false;
            }
        };
        let patch = match (key, &value) {
            ("x" | "y" | "width" | "height", PropertyValue::Number(n)) => {
                let mut patch = ComponentPatch::default();
                match key {
                    "x" => patch.frame.x = Some(*n),
                    "y" => patch.frame.y = Some(*n),
                    "width" => patch.frame.width = Some(*n),
                    _ => patch.frame.height = Some(*n),
                }
                patch
            }
            ("x" | "y" | "width" | "height", _) => {
                log::warn!("`{key}` must be a number");
                return false;
            }
            _ => ComponentPatch::property(key, value),
        };
        self.dispatch(Command::UpdateComponent { id, patch })
    }

    /// Set an image component's source (URL or data URL).
    pub fn set_image(&mut self, id: &str, src: &str, file_name: Option<String>) -> bool {
        let result = self
            .session
            .set_image_source(ComponentId::intern(id), src, file_name.as_deref());
        log_rejection(result)
    }

    pub fn remove_image(&mut self, id: &str) -> bool {
        log_rejection(self.session.remove_image(ComponentId::intern(id)))
    }

    pub fn get_component_count(&self) -> usize {
        self.session.components().len()
    }

    // ─── Templates, theme, files ─────────────────────────────────────────

    /// Built-in templates as JSON `[{"id","name","description","deviceClass","width","height"}]`.
    pub fn list_templates(&self) -> String {
        let templates: Vec<Value> = DEVICE_TEMPLATES
            .iter()
            .map(|t| {
                json!({
                    "id": t.id,
                    "name": t.name,
                    "description": t.description,
                    "deviceClass": t.device_class,
                    "width": t.resolution.width,
                    "height": t.resolution.height,
                })
            })
            .collect();
        Value::Array(templates).to_string()
    }

    pub fn load_template(&mut self, id: &str) -> bool {
        let loaded = log_rejection(self.session.load_template(id).map(|_| true));
        if loaded {
            self.session.dispatch(Command::CenterCanvas).is_ok()
        } else {
            false
        }
    }

    pub fn create_blank(&mut self) -> bool {
        self.load_template(BLANK_TEMPLATE_ID)
    }

    /// `"light"` or `"dark"`. Unknown names are ignored.
    pub fn set_theme(&mut self, name: &str) -> bool {
        match ThemeMode::parse(name) {
            Some(mode) => {
                self.session.set_theme(mode);
                true
            }
            None => {
                log::warn!("unknown theme `{name}`");
                false
            }
        }
    }

    pub fn set_background(&mut self, color: &str) -> bool {
        self.dispatch(Command::SetCanvasBackground(color.to_string()))
    }

    /// Load a layout file. Returns JSON `{"ok":true,"count":n}` or
    /// `{"ok":false,"error":"…"}`.
    pub fn import_json(&mut self, text: &str) -> String {
        match self.session.import_json(text) {
            Ok(count) => json!({ "ok": true, "count": count }).to_string(),
            Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
        }
    }

    /// The layout file contents (pretty JSON), or an empty string on error.
    pub fn export_json(&self) -> String {
        self.session.export_json().unwrap_or_else(|e| {
            log::error!("export failed: {e}");
            String::new()
        })
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// Image URLs the host should fetch, as a JSON array. Drains the queue.
    pub fn take_image_fetches(&mut self) -> String {
        let urls = self.session.take_pending_image_fetches();
        serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn complete_image(&mut self, src: &str, bytes: &[u8]) {
        self.session.complete_image(src, bytes);
    }

    pub fn fail_image(&mut self, src: &str, reason: &str) {
        self.session.fail_image(src, reason);
    }

    /// Apply finished image loads. Returns `true` if a redraw is needed.
    pub fn poll_images(&mut self) -> bool {
        self.session.poll_images()
    }
}

impl SurfaceDesigner {
    fn with_session(mut session: EditorSession, width: f64, height: f64) -> Self {
        install_console_hooks();
        session.resize_viewport(Size::new(width, height), true);
        Self {
            session,
            blits: BlitCache::default(),
        }
    }

    fn dispatch(&mut self, command: Command) -> bool {
        log_rejection(self.session.dispatch(command))
    }
}

fn log_rejection<E: std::fmt::Display>(result: Result<bool, E>) -> bool {
    result.unwrap_or_else(|e| {
        log::warn!("rejected: {e}");
        false
    })
}

fn component_json(c: &PlacedComponent) -> Value {
    let properties = match &c.kind {
        ComponentKind::Button(p) => serde_json::to_value(p),
        ComponentKind::Text(p) => serde_json::to_value(p),
        ComponentKind::Input(p) => serde_json::to_value(p),
        ComponentKind::Image(p) => serde_json::to_value(p),
    }
    .unwrap_or(Value::Null);
    json!({
        "id": c.id.as_str(),
        "type": c.component_type().as_str(),
        "x": c.frame.x,
        "y": c.frame.y,
        "width": c.frame.width,
        "height": c.frame.height,
        "properties": properties,
    })
}

// ─── Console logging ─────────────────────────────────────────────────────

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[sd] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn install_console_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("SD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}
