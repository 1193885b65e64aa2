//! JSON layout file format: export and validated import.
//!
//! ```json
//! {
//!   "components": [
//!     { "id": "button-1", "type": "button", "x": 50, "y": 50,
//!       "width": 150, "height": 50, "properties": { "text": "OK" } }
//!   ],
//!   "canvasWidth": 800,
//!   "canvasHeight": 600
//! }
//! ```
//!
//! Import is all-or-nothing: every component is checked (known `type`,
//! numeric frame, well-typed properties, unique ids) before anything is
//! returned. Property keys a kind does not know are dropped with a warning.

use crate::error::{ExportError, ImportError};
use crate::id::ComponentId;
use crate::model::{
    ButtonProps, CanvasSize, ComponentKind, ComponentType, Document, Frame, ImageProps,
    InputProps, PlacedComponent, PropertyValue, TextProps,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "layout.json";

// ─── Wire records ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct ComponentRecord {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    components: Vec<ComponentRecord>,
    canvas_width: f64,
    canvas_height: f64,
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLayout {
    pub components: Vec<PlacedComponent>,
    /// Canvas size stored in the file, if both dimensions were present.
    /// Informational only; loading a layout keeps the current canvas.
    pub canvas_size: Option<CanvasSize>,
}

// ─── Export ───────────────────────────────────────────────────────────────

fn kind_properties(kind: &ComponentKind) -> Result<Map<String, Value>, serde_json::Error> {
    let value = match kind {
        ComponentKind::Button(p) => serde_json::to_value(p)?,
        ComponentKind::Text(p) => serde_json::to_value(p)?,
        ComponentKind::Input(p) => serde_json::to_value(p)?,
        ComponentKind::Image(p) => serde_json::to_value(p)?,
    };
    Ok(match value {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn to_record(component: &PlacedComponent) -> Result<ComponentRecord, serde_json::Error> {
    let f = component.frame;
    Ok(ComponentRecord {
        id: component.id.as_str().to_string(),
        kind: component.component_type().as_str().to_string(),
        x: f.x,
        y: f.y,
        width: f.width,
        height: f.height,
        properties: kind_properties(&component.kind)?,
    })
}

/// Serialize a document as pretty-printed JSON (two-space indent).
pub fn export_layout(doc: &Document) -> Result<String, serde_json::Error> {
    let file = LayoutFile {
        components: doc.components.iter().map(to_record).collect::<Result<_, _>>()?,
        canvas_width: doc.canvas_size.width,
        canvas_height: doc.canvas_size.height,
    };
    serde_json::to_string_pretty(&file)
}

// ─── Import ───────────────────────────────────────────────────────────────

fn build_kind(
    index: usize,
    ty: ComponentType,
    properties: Map<String, Value>,
) -> Result<ComponentKind, ImportError> {
    let mut kind = match ty {
        ComponentType::Button => ComponentKind::Button(ButtonProps::default()),
        ComponentType::Text => ComponentKind::Text(TextProps::default()),
        ComponentType::Input => ComponentKind::Input(InputProps::default()),
        ComponentType::Image => ComponentKind::Image(ImageProps::default()),
    };
    for (key, value) in properties {
        if !ty.property_keys().contains(&key.as_str()) {
            log::warn!("component {index}: dropping unknown `{}` property `{key}`", ty.as_str());
            continue;
        }
        if value.is_null() {
            continue;
        }
        let value: PropertyValue = serde_json::from_value(value).map_err(|_| {
            ImportError::InvalidComponent {
                index,
                reason: format!("property `{key}` must be a string, number or boolean"),
            }
        })?;
        kind.set_property(&key, value)
            .map_err(|e| ImportError::InvalidComponent {
                index,
                reason: e.to_string(),
            })?;
    }
    Ok(kind)
}

fn from_record(index: usize, record: ComponentRecord) -> Result<PlacedComponent, ImportError> {
    let ty = ComponentType::parse(&record.kind).ok_or_else(|| ImportError::UnknownKind {
        index,
        kind: record.kind.clone(),
    })?;
    if record.id.is_empty() {
        return Err(ImportError::InvalidComponent {
            index,
            reason: "empty id".into(),
        });
    }
    let kind = build_kind(index, ty, record.properties)?;
    Ok(PlacedComponent::new(
        ComponentId::intern(&record.id),
        Frame::new(record.x, record.y, record.width, record.height),
        kind,
    ))
}

/// Parse and validate a layout file.
///
/// A missing `components` field is treated as an empty list.
///
/// # Errors
/// Returns [`ImportError`] on malformed JSON, unknown component types,
/// mistyped fields or duplicate ids. Nothing is partially returned.
pub fn import_layout(text: &str) -> Result<ImportedLayout, ImportError> {
    let root: Value = serde_json::from_str(text)?;
    let Value::Object(mut root) = root else {
        return Err(ImportError::NotAnObject);
    };

    let raw = match root.remove("components") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ImportError::ComponentsNotArray),
    };

    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(raw.len());
    for (index, item) in raw.into_iter().enumerate() {
        let record: ComponentRecord =
            serde_json::from_value(item).map_err(|e| ImportError::InvalidComponent {
                index,
                reason: e.to_string(),
            })?;
        let component = from_record(index, record)?;
        if !seen.insert(component.id) {
            return Err(ImportError::DuplicateId(component.id.as_str().to_string()));
        }
        components.push(component);
    }

    let canvas_size = match (
        root.get("canvasWidth").and_then(Value::as_f64),
        root.get("canvasHeight").and_then(Value::as_f64),
    ) {
        (Some(w), Some(h)) => Some(CanvasSize::new(w, h)),
        _ => None,
    };

    log::debug!("imported {} components", components.len());
    Ok(ImportedLayout {
        components,
        canvas_size,
    })
}

// ─── Files ────────────────────────────────────────────────────────────────

pub fn read_layout_file(path: &Path) -> Result<ImportedLayout, ImportError> {
    let text = std::fs::read_to_string(path)?;
    import_layout(&text)
}

pub fn write_layout_file(path: &Path, doc: &Document) -> Result<(), ExportError> {
    let text = export_layout(doc)?;
    std::fs::write(path, text)?;
    Ok(())
}
