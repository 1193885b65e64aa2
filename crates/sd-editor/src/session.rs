//! Editor session: the single owner of document, selection, history,
//! viewport, interaction state, theme and image cache.
//!
//! All changes go through [`EditorSession::dispatch`] (directly, or via
//! [`EditorSession::handle_event`] which turns input into commands). A
//! document mutation and its history entry always happen in the same call.

use crate::commands::{Command, EditorError};
use crate::input::{InputEvent, Modifiers};
use crate::interaction::{Context, Cursor, Interaction, InteractionState};
use crate::library::{ADD_ORIGIN, create_component};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::viewport::Viewport;
use kurbo::{Point, Size};
use sd_core::config::EditorConfig;
use sd_core::error::ExportError;
use sd_core::format::{export_layout, import_layout};
use sd_core::history::History;
use sd_core::id::ComponentId;
use sd_core::model::{CanvasSize, ComponentPatch, ComponentType, Document, PlacedComponent};
use sd_core::templates::{Template, find_template};
use sd_render::images::ImageCache;
use sd_render::paint::{RenderInput, RenderReport, render_document};
use sd_render::surface::DrawingSurface;
use sd_render::theme::{CanvasTheme, ThemeMode};
use std::collections::HashSet;

pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    selection: Option<ComponentId>,
    history: History,
    viewport: Viewport,
    interaction: Interaction,
    cursor: Cursor,
    theme: ThemeMode,
    canvas_theme: CanvasTheme,
    images: ImageCache,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new(
            CanvasSize::new(config.default_canvas_width, config.default_canvas_height),
            &config.default_background,
        );
        let history = History::with_baseline(document.components.clone(), config.history_depth);
        Self {
            config,
            document,
            selection: None,
            history,
            viewport: Viewport::default(),
            interaction: Interaction::new(),
            cursor: Cursor::Default,
            theme: ThemeMode::Light,
            canvas_theme: CanvasTheme::light(),
            images: ImageCache::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn components(&self) -> &[PlacedComponent] {
        &self.document.components
    }

    pub fn selection(&self) -> Option<ComponentId> {
        self.selection
    }

    pub fn selected_component(&self) -> Option<&PlacedComponent> {
        self.selection.and_then(|id| self.document.get(id))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn interaction_state(&self) -> &InteractionState {
        self.interaction.state()
    }

    pub fn duplicate_mode(&self) -> bool {
        self.interaction.duplicate_mode()
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Apply a command. Returns `Ok(true)` if anything visible changed.
    ///
    /// # Errors
    /// Unknown or duplicate ids, bad property patches and unknown
    /// templates are rejected with the session left unchanged.
    pub fn dispatch(&mut self, command: Command) -> Result<bool, EditorError> {
        log::trace!("dispatch {}", command.label());
        match command {
            Command::AddComponent(component) => {
                let id = component.id;
                if !self.document.add_component(component, self.config.min_component_size) {
                    return Err(EditorError::DuplicateId(id));
                }
                self.record(None);
                Ok(true)
            }

            Command::UpdateComponent { id, patch } => {
                let found =
                    self.document
                        .update_component(id, &patch, self.config.min_component_size)?;
                if !found {
                    return Err(EditorError::UnknownComponent(id));
                }
                self.record(Some(id));
                Ok(true)
            }

            Command::DeleteComponent(id) => {
                if self.document.delete_component(id).is_none() {
                    return Err(EditorError::UnknownComponent(id));
                }
                if self.selection == Some(id) {
                    self.selection = None;
                }
                if self.interaction.gesture_target() == Some(id) {
                    self.interaction.reset();
                }
                self.record(None);
                Ok(true)
            }

            Command::LoadComponents(components) => {
                check_unique(&components)?;
                self.document
                    .replace_components(components, self.config.min_component_size);
                self.after_wholesale_load();
                Ok(true)
            }

            Command::LoadTemplate(template) => {
                check_unique(&template.components)?;
                log::debug!(
                    "loading template {} ({}x{})",
                    template.id,
                    template.resolution.width,
                    template.resolution.height
                );
                self.document.canvas_size = template.resolution;
                self.document
                    .replace_components(template.components, self.config.min_component_size);
                self.after_wholesale_load();
                Ok(true)
            }

            Command::Undo => {
                let Some(snapshot) = self.history.undo() else {
                    return Ok(false);
                };
                self.document.components = snapshot.clone();
                self.after_history_move();
                Ok(true)
            }

            Command::Redo => {
                let Some(snapshot) = self.history.redo() else {
                    return Ok(false);
                };
                self.document.components = snapshot.clone();
                self.after_history_move();
                Ok(true)
            }

            Command::SelectComponent(selection) => {
                if let Some(id) = selection
                    && !self.document.contains(id)
                {
                    return Err(EditorError::UnknownComponent(id));
                }
                let changed = self.selection != selection;
                self.selection = selection;
                Ok(changed)
            }

            Command::SetCanvasBackground(color) => {
                let changed = self.document.background_color != color;
                self.document.background_color = color;
                Ok(changed)
            }

            Command::SetZoom(zoom) => {
                let before = self.viewport.zoom;
                self.viewport.set_zoom(zoom, &self.config);
                Ok(self.viewport.zoom != before)
            }

            Command::ZoomBy(delta) => {
                let before = self.viewport.zoom;
                self.viewport.zoom_by(delta, &self.config);
                Ok(self.viewport.zoom != before)
            }

            Command::SetPan(pan) => {
                let changed = self.viewport.pan != pan;
                self.viewport.pan = pan;
                Ok(changed)
            }

            Command::SetViewportSize(size) => {
                let changed = self.viewport.size != size;
                self.viewport.size = size;
                Ok(changed)
            }

            Command::CenterCanvas => {
                self.viewport.center_on(self.document.canvas_size);
                Ok(true)
            }
        }
    }

    /// Snapshot the components. Only an update to the component under the
    /// open drag or resize merges into that gesture's entry.
    fn record(&mut self, updated: Option<ComponentId>) {
        let snapshot = self.document.components.clone();
        if updated.is_some() && updated == self.interaction.gesture_target() {
            self.history.record(snapshot);
        } else {
            self.history.record_standalone(snapshot);
        }
    }

    fn after_wholesale_load(&mut self) {
        if let Some(id) = self.selection
            && !self.document.contains(id)
        {
            self.selection = None;
        }
        self.record(None);
        self.interaction.reset();
    }

    fn after_history_move(&mut self) {
        self.selection = None;
        self.interaction.reset();
    }

    /// Dispatch interaction-produced commands. These are built from the
    /// current document, so a rejection means a logic error upstream.
    fn apply_all(&mut self, commands: impl IntoIterator<Item = Command>) -> bool {
        let mut changed = false;
        for command in commands {
            match self.dispatch(command) {
                Ok(c) => changed |= c,
                Err(e) => log::warn!("interaction command rejected: {e}"),
            }
        }
        changed
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event. Returns `true` if a redraw is needed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => {
                let ctx = Context {
                    document: &self.document,
                    selection: self.selection,
                    viewport: &self.viewport,
                    config: &self.config,
                };
                let response =
                    self.interaction
                        .pointer_down(&ctx, Point::new(*x, *y), *button, modifiers.alt);
                self.cursor = response.cursor;
                let changed = self.apply_all(response.commands);
                if self.interaction.in_edit_gesture() && self.config.coalesce_gestures {
                    self.history.begin_gesture();
                }
                changed
            }

            InputEvent::PointerMove { x, y, .. } => {
                let ctx = Context {
                    document: &self.document,
                    selection: self.selection,
                    viewport: &self.viewport,
                    config: &self.config,
                };
                let response = self.interaction.pointer_move(&ctx, Point::new(*x, *y));
                let cursor_changed = self.cursor != response.cursor;
                self.cursor = response.cursor;
                self.apply_all(response.commands) || cursor_changed
            }

            InputEvent::PointerUp { .. } => {
                let response = self.interaction.pointer_up();
                self.cursor = response.cursor;
                if self.history.end_gesture() {
                    log::debug!("gesture recorded as one history entry");
                }
                false
            }

            InputEvent::Wheel { delta_y } => {
                let delta = Viewport::wheel_delta(*delta_y, self.config.zoom_step);
                self.apply_all([Command::ZoomBy(delta)])
            }

            InputEvent::KeyDown {
                key,
                modifiers,
                text_input_focused,
            } => self.key_down(key, *modifiers, *text_input_focused),

            InputEvent::KeyUp { key } => {
                if key == "Alt" && self.interaction.duplicate_mode() {
                    self.interaction.set_duplicate_mode(false);
                    return true;
                }
                false
            }
        }
    }

    fn key_down(&mut self, key: &str, m: Modifiers, text_input_focused: bool) -> bool {
        if key == "Alt" {
            let changed = !self.interaction.duplicate_mode();
            self.interaction.set_duplicate_mode(true);
            return changed;
        }
        if text_input_focused {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, m.ctrl, m.shift, m.alt, m.meta) else {
            return false;
        };
        log::debug!("shortcut {key} → {action:?}");
        match action {
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Undo => self.apply_all([Command::Undo]),
            ShortcutAction::Redo => self.apply_all([Command::Redo]),
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::Deselect => self.apply_all([Command::SelectComponent(None)]),
        }
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// Delete the selected component, if any.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection {
            Some(id) => self.apply_all([Command::DeleteComponent(id)]),
            None => false,
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        self.apply_all([Command::ZoomBy(self.config.zoom_step)])
    }

    pub fn zoom_out(&mut self) -> bool {
        self.apply_all([Command::ZoomBy(-self.config.zoom_step)])
    }

    // ─── Library, templates, theme ───────────────────────────────────────

    /// "Click to add": a new component at the default position.
    pub fn add_from_library(&mut self, ty: ComponentType) -> Result<ComponentId, EditorError> {
        let component = create_component(ty, ADD_ORIGIN, self.theme);
        let id = component.id;
        self.dispatch(Command::AddComponent(component))?;
        Ok(id)
    }

    /// Drop a library item at a screen position.
    pub fn drop_from_library(
        &mut self,
        ty: ComponentType,
        screen: Point,
    ) -> Result<ComponentId, EditorError> {
        let origin = self.viewport.screen_to_document(screen);
        let component = create_component(ty, origin, self.theme);
        let id = component.id;
        self.dispatch(Command::AddComponent(component))?;
        Ok(id)
    }

    pub fn load_template(&mut self, id: &str) -> Result<&'static Template, EditorError> {
        let template = find_template(id).ok_or_else(|| EditorError::UnknownTemplate(id.to_string()))?;
        self.dispatch(Command::LoadTemplate(template.clone()))?;
        Ok(template)
    }

    /// Switch theme. The canvas background follows the theme; no history
    /// entry is recorded.
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        self.canvas_theme = theme.canvas_theme();
        self.document.background_color = theme.canvas_background().to_string();
    }

    // ─── Image properties ────────────────────────────────────────────────

    /// Point an image component at a new source (URL or `data:` URL).
    pub fn set_image_source(
        &mut self,
        id: ComponentId,
        src: &str,
        file_name: Option<&str>,
    ) -> Result<bool, EditorError> {
        let patch = ComponentPatch::property("src", src)
            .with_property("fileName", file_name.unwrap_or_default());
        self.dispatch(Command::UpdateComponent { id, patch })
    }

    pub fn remove_image(&mut self, id: ComponentId) -> Result<bool, EditorError> {
        self.set_image_source(id, "", None)
    }

    // ─── Import / export ─────────────────────────────────────────────────

    /// Replace the components from a layout file. The canvas size stored
    /// in the file is not applied.
    pub fn import_json(&mut self, text: &str) -> Result<usize, EditorError> {
        let layout = import_layout(text).inspect_err(|e| log::warn!("import rejected: {e}"))?;
        if let Some(size) = layout.canvas_size
            && size != self.document.canvas_size
        {
            log::debug!(
                "ignoring file canvas size {}x{}; keeping {}x{}",
                size.width,
                size.height,
                self.document.canvas_size.width,
                self.document.canvas_size.height
            );
        }
        let count = layout.components.len();
        self.dispatch(Command::LoadComponents(layout.components))?;
        Ok(count)
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        export_layout(&self.document).map_err(|e| EditorError::Export(ExportError::from(e)))
    }

    // ─── Images & rendering ──────────────────────────────────────────────

    /// Apply finished image loads. Returns `true` if a redraw is needed.
    pub fn poll_images(&mut self) -> bool {
        self.images.poll()
    }

    /// Non-`data:` sources the host should fetch.
    pub fn take_pending_image_fetches(&mut self) -> Vec<String> {
        self.images.take_pending_fetches()
    }

    pub fn complete_image(&mut self, src: &str, bytes: &[u8]) {
        self.images.complete(src, bytes);
    }

    pub fn fail_image(&mut self, src: &str, reason: &str) {
        self.images.fail(src, reason);
    }

    /// Paint the current state and start loading any new image sources.
    pub fn render<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> RenderReport {
        let input = RenderInput {
            document: &self.document,
            selection: self.selection,
            zoom: self.viewport.zoom,
            pan: self.viewport.pan,
            surface_size: self.viewport.size,
            theme: &self.canvas_theme,
            duplicate_mode: self.interaction.duplicate_mode(),
            grid_size: self.config.grid_size,
            handle_size: self.config.handle_size,
        };
        let report = render_document(surface, &input, &self.images);
        for src in &report.unrequested_images {
            self.images.request(src);
        }
        report
    }

    /// Convenience for hosts: report the surface size and center.
    pub fn resize_viewport(&mut self, size: Size, center: bool) -> bool {
        let mut changed = self.apply_all([Command::SetViewportSize(size)]);
        if center {
            changed |= self.apply_all([Command::CenterCanvas]);
        }
        changed
    }
}

fn check_unique(components: &[PlacedComponent]) -> Result<(), EditorError> {
    let mut seen = HashSet::new();
    for c in components {
        if !seen.insert(c.id) {
            return Err(EditorError::DuplicateId(c.id));
        }
    }
    Ok(())
}
