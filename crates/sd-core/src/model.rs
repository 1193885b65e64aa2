//! Core data model for layout documents.
//!
//! A document is a fixed-size canvas holding an ordered list of placed
//! components. Array order is paint order: the last component is drawn on
//! top and wins hit tests. Each component kind carries its own typed
//! property struct, so a button can never end up with an image `src`.
//!
//! All geometry is in document space (canvas pixels, independent of zoom
//! and pan). Every mutation clamps frames back inside the canvas instead of
//! rejecting them.

use crate::error::PropertyError;
use crate::id::ComponentId;
use serde::{Deserialize, Serialize};

/// Upper bound for `borderRadius` on any kind.
pub const MAX_BORDER_RADIUS: f64 = 20.0;

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned component bounds in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment: points on the edge count as inside.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Shift the origin, keeping the size.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Floor the size at `min_size`, cap it at the canvas size, then pull
    /// the origin back so the frame lies inside `[0, canvas]`.
    pub fn clamped_to(&self, canvas: CanvasSize, min_size: f64) -> Self {
        let width = self.width.max(min_size).min(canvas.width);
        let height = self.height.max(min_size).min(canvas.height);
        Self {
            x: self.x.min(canvas.width - width).max(0.0),
            y: self.y.min(canvas.height - height).max(0.0),
            width,
            height,
        }
    }

    /// Clamp only the origin; the size is kept as-is.
    pub fn with_origin_clamped(&self, canvas: CanvasSize) -> Self {
        Self {
            x: self.x.min(canvas.width - self.width).max(0.0),
            y: self.y.min(canvas.height - self.height).max(0.0),
            ..*self
        }
    }
}

/// Logical design resolution of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

// ─── Property values ─────────────────────────────────────────────────────

/// A loosely-typed property value as it appears in JSON and patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn expect_text(key: &str, value: PropertyValue) -> Result<Option<String>, PropertyError> {
    match value {
        PropertyValue::Text(s) => Ok(Some(s)),
        _ => Err(PropertyError::TypeMismatch {
            key: key.to_string(),
            expected: "string",
        }),
    }
}

fn expect_number(key: &str, value: PropertyValue) -> Result<Option<f64>, PropertyError> {
    match value {
        PropertyValue::Number(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(PropertyError::TypeMismatch {
            key: key.to_string(),
            expected: "finite number",
        }),
    }
}

fn expect_radius(key: &str, value: PropertyValue) -> Result<Option<f64>, PropertyError> {
    Ok(expect_number(key, value)?.map(|r| r.clamp(0.0, MAX_BORDER_RADIUS)))
}

fn unknown(kind: ComponentType, key: &str) -> PropertyError {
    PropertyError::UnknownProperty {
        kind: kind.as_str(),
        key: key.to_string(),
    }
}

// ─── Typed properties ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl ButtonProps {
    const KEYS: &'static [&'static str] =
        &["text", "backgroundColor", "textColor", "fontSize", "borderRadius"];

    fn set(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "text" => self.text = expect_text(key, value)?,
            "backgroundColor" => self.background_color = expect_text(key, value)?,
            "textColor" => self.text_color = expect_text(key, value)?,
            "fontSize" => self.font_size = expect_number(key, value)?,
            "borderRadius" => self.border_radius = expect_radius(key, value)?,
            _ => return Err(unknown(ComponentType::Button, key)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl TextProps {
    const KEYS: &'static [&'static str] = &["text", "textColor", "fontSize"];

    fn set(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "text" => self.text = expect_text(key, value)?,
            "textColor" => self.text_color = expect_text(key, value)?,
            "fontSize" => self.font_size = expect_number(key, value)?,
            _ => return Err(unknown(ComponentType::Text, key)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl InputProps {
    const KEYS: &'static [&'static str] = &[
        "placeholder",
        "backgroundColor",
        "textColor",
        "fontSize",
        "borderRadius",
    ];

    fn set(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "placeholder" => self.placeholder = expect_text(key, value)?,
            "backgroundColor" => self.background_color = expect_text(key, value)?,
            "textColor" => self.text_color = expect_text(key, value)?,
            "fontSize" => self.font_size = expect_number(key, value)?,
            "borderRadius" => self.border_radius = expect_radius(key, value)?,
            _ => return Err(unknown(ComponentType::Input, key)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl ImageProps {
    const KEYS: &'static [&'static str] = &["src", "fileName", "borderRadius"];

    fn set(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match key {
            "src" => self.src = expect_text(key, value)?,
            "fileName" => self.file_name = expect_text(key, value)?,
            "borderRadius" => self.border_radius = expect_radius(key, value)?,
            _ => return Err(unknown(ComponentType::Image, key)),
        }
        Ok(())
    }

    /// The image source, treating an empty string as "no image".
    pub fn source(&self) -> Option<&str> {
        self.src.as_deref().filter(|s| !s.is_empty())
    }
}

// ─── Component kinds ─────────────────────────────────────────────────────

/// The closed set of component types, without properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Button,
    Text,
    Input,
    Image,
}

impl ComponentType {
    pub const ALL: [ComponentType; 4] = [Self::Button, Self::Text, Self::Input, Self::Image];

    /// The lowercase wire name (`"button"`, `"text"`, …).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Text => "text",
            Self::Input => "input",
            Self::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "button" => Some(Self::Button),
            "text" => Some(Self::Text),
            "input" => Some(Self::Input),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    /// Property names this kind accepts.
    pub fn property_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Button => ButtonProps::KEYS,
            Self::Text => TextProps::KEYS,
            Self::Input => InputProps::KEYS,
            Self::Image => ImageProps::KEYS,
        }
    }
}

/// A component kind together with its typed properties.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Button(ButtonProps),
    Text(TextProps),
    Input(InputProps),
    Image(ImageProps),
}

impl ComponentKind {
    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::Button(_) => ComponentType::Button,
            Self::Text(_) => ComponentType::Text,
            Self::Input(_) => ComponentType::Input,
            Self::Image(_) => ComponentType::Image,
        }
    }

    /// Set one property, checking that the key exists for this kind and
    /// the value has the right shape.
    pub fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match self {
            Self::Button(p) => p.set(key, value),
            Self::Text(p) => p.set(key, value),
            Self::Input(p) => p.set(key, value),
            Self::Image(p) => p.set(key, value),
        }
    }
}

// ─── Placed component ────────────────────────────────────────────────────

/// One design element on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedComponent {
    pub id: ComponentId,
    pub frame: Frame,
    pub kind: ComponentKind,
}

impl PlacedComponent {
    pub fn new(id: ComponentId, frame: Frame, kind: ComponentKind) -> Self {
        Self { id, frame, kind }
    }

    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// A copy with a fresh id and the frame shifted by `(dx, dy)`, clamped
    /// so the copy stays on the canvas.
    pub fn duplicate(&self, dx: f64, dy: f64, canvas: CanvasSize) -> Self {
        Self {
            id: ComponentId::generate(self.component_type().as_str()),
            frame: self.frame.offset(dx, dy).with_origin_clamped(canvas),
            kind: self.kind.clone(),
        }
    }
}

// ─── Patches ─────────────────────────────────────────────────────────────

/// Partial frame update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FramePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// A partial update to a component: frame fields merged individually,
/// properties merged shallowly (given keys overwrite, others survive).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentPatch {
    pub frame: FramePatch,
    pub properties: Vec<(String, PropertyValue)>,
}

impl ComponentPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            frame: FramePatch {
                x: Some(x),
                y: Some(y),
                ..FramePatch::default()
            },
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            frame: FramePatch {
                width: Some(width),
                height: Some(height),
                ..FramePatch::default()
            },
            ..Self::default()
        }
    }

    pub fn frame(frame: Frame) -> Self {
        Self {
            frame: FramePatch {
                x: Some(frame.x),
                y: Some(frame.y),
                width: Some(frame.width),
                height: Some(frame.height),
            },
            ..Self::default()
        }
    }

    pub fn property(key: &str, value: impl Into<PropertyValue>) -> Self {
        Self::default().with_property(key, value)
    }

    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((key.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frame == FramePatch::default() && self.properties.is_empty()
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The design being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub components: Vec<PlacedComponent>,
    pub canvas_size: CanvasSize,
    pub background_color: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(CanvasSize::default(), "#ffffff")
    }
}

impl Document {
    pub fn new(canvas_size: CanvasSize, background_color: &str) -> Self {
        Self {
            components: Vec::new(),
            canvas_size,
            background_color: background_color.to_string(),
        }
    }

    pub fn get(&self, id: ComponentId) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append a component on top, clamping its frame onto the canvas.
    /// Returns `false` (and changes nothing) if the id is already taken.
    pub fn add_component(&mut self, mut component: PlacedComponent, min_size: f64) -> bool {
        if self.contains(component.id) {
            return false;
        }
        component.frame = component.frame.clamped_to(self.canvas_size, min_size);
        self.components.push(component);
        true
    }

    /// Merge `patch` into the component with `id`.
    ///
    /// The patch is applied to a copy first, so a bad property leaves the
    /// document untouched. Returns `Ok(false)` if no component has `id`.
    pub fn update_component(
        &mut self,
        id: ComponentId,
        patch: &ComponentPatch,
        min_size: f64,
    ) -> Result<bool, PropertyError> {
        let Some(idx) = self.index_of(id) else {
            return Ok(false);
        };
        let mut updated = self.components[idx].clone();
        for (key, value) in &patch.properties {
            updated.kind.set_property(key, value.clone())?;
        }
        let f = &mut updated.frame;
        f.x = patch.frame.x.unwrap_or(f.x);
        f.y = patch.frame.y.unwrap_or(f.y);
        f.width = patch.frame.width.unwrap_or(f.width);
        f.height = patch.frame.height.unwrap_or(f.height);
        updated.frame = updated.frame.clamped_to(self.canvas_size, min_size);
        self.components[idx] = updated;
        Ok(true)
    }

    pub fn delete_component(&mut self, id: ComponentId) -> Option<PlacedComponent> {
        let idx = self.index_of(id)?;
        Some(self.components.remove(idx))
    }

    /// Replace every component, clamping each frame onto the current canvas.
    pub fn replace_components(&mut self, components: Vec<PlacedComponent>, min_size: f64) {
        let canvas = self.canvas_size;
        self.components = components
            .into_iter()
            .map(|mut c| {
                c.frame = c.frame.clamped_to(canvas, min_size);
                c
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: &str, frame: Frame) -> PlacedComponent {
        PlacedComponent::new(
            ComponentId::intern(id),
            frame,
            ComponentKind::Button(ButtonProps::default()),
        )
    }

    #[test]
    fn add_clamps_into_canvas() {
        let mut doc = Document::default();
        assert!(doc.add_component(button("b", Frame::new(780.0, 580.0, 120.0, 40.0)), 10.0));
        assert_eq!(doc.components[0].frame, Frame::new(680.0, 560.0, 120.0, 40.0));
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut doc = Document::default();
        assert!(doc.add_component(button("dup", Frame::new(0.0, 0.0, 50.0, 50.0)), 10.0));
        assert!(!doc.add_component(button("dup", Frame::new(10.0, 10.0, 50.0, 50.0)), 10.0));
        assert_eq!(doc.components.len(), 1);
    }

    #[test]
    fn oversized_frame_is_capped_to_canvas() {
        let canvas = CanvasSize::new(200.0, 100.0);
        let f = Frame::new(-50.0, 20.0, 400.0, 5.0).clamped_to(canvas, 10.0);
        assert_eq!(f, Frame::new(0.0, 20.0, 200.0, 10.0));
    }

    #[test]
    fn update_merges_properties_shallowly() {
        let mut doc = Document::default();
        let mut b = button("merge", Frame::new(0.0, 0.0, 100.0, 40.0));
        if let ComponentKind::Button(p) = &mut b.kind {
            p.text = Some("OK".into());
            p.text_color = Some("#fff".into());
        }
        doc.add_component(b, 10.0);

        let patch = ComponentPatch::property("text", "Cancel").with_property("fontSize", 18.0);
        assert_eq!(doc.update_component(ComponentId::intern("merge"), &patch, 10.0), Ok(true));

        let ComponentKind::Button(p) = &doc.components[0].kind else {
            panic!("expected button");
        };
        assert_eq!(p.text.as_deref(), Some("Cancel"));
        assert_eq!(p.text_color.as_deref(), Some("#fff"));
        assert_eq!(p.font_size, Some(18.0));
    }

    #[test]
    fn update_with_bad_property_leaves_document_untouched() {
        let mut doc = Document::default();
        doc.add_component(button("bad", Frame::new(0.0, 0.0, 100.0, 40.0)), 10.0);
        let before = doc.clone();

        let patch = ComponentPatch::position(30.0, 30.0).with_property("src", "x.png");
        let err = doc
            .update_component(ComponentId::intern("bad"), &patch, 10.0)
            .unwrap_err();
        assert!(matches!(err, PropertyError::UnknownProperty { kind: "button", .. }));
        assert_eq!(doc, before);

        let patch = ComponentPatch::property("fontSize", "huge");
        assert!(doc.update_component(ComponentId::intern("bad"), &patch, 10.0).is_err());
        assert_eq!(doc, before);
    }

    #[test]
    fn update_floors_size_at_minimum() {
        let mut doc = Document::default();
        doc.add_component(button("tiny", Frame::new(0.0, 0.0, 100.0, 40.0)), 10.0);
        doc.update_component(ComponentId::intern("tiny"), &ComponentPatch::size(2.0, 4.0), 10.0)
            .unwrap();
        assert_eq!(doc.components[0].frame.width, 10.0);
        assert_eq!(doc.components[0].frame.height, 10.0);
    }

    #[test]
    fn border_radius_is_clamped() {
        let mut kind = ComponentKind::Image(ImageProps::default());
        kind.set_property("borderRadius", PropertyValue::Number(64.0)).unwrap();
        let ComponentKind::Image(p) = kind else { unreachable!() };
        assert_eq!(p.border_radius, Some(MAX_BORDER_RADIUS));
    }

    #[test]
    fn duplicate_offsets_and_clamps() {
        let canvas = CanvasSize::new(800.0, 600.0);
        let original = button("orig", Frame::new(700.0, 100.0, 100.0, 40.0));
        let copy = original.duplicate(20.0, 20.0, canvas);
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.frame, Frame::new(700.0, 120.0, 100.0, 40.0));
        assert_eq!(copy.kind, original.kind);
    }

    #[test]
    fn frame_contains_is_inclusive() {
        let f = Frame::new(10.0, 10.0, 20.0, 20.0);
        assert!(f.contains(10.0, 10.0));
        assert!(f.contains(30.0, 30.0));
        assert!(!f.contains(30.1, 15.0));
    }

    #[test]
    fn empty_image_source_counts_as_missing() {
        let props = ImageProps {
            src: Some(String::new()),
            ..ImageProps::default()
        };
        assert_eq!(props.source(), None);
    }
}
