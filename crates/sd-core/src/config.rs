//! Editor configuration: geometry limits, zoom behaviour, and history depth.
//!
//! Every field has a default matching the designer's stock behaviour, so a
//! host only needs to supply the values it wants to change. Hosts can load
//! overrides from JSON; missing keys fall back to the defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lowest zoom factor. Default: **0.1**.
    pub min_zoom: f64,

    /// Highest zoom factor. Default: **3.0**.
    pub max_zoom: f64,

    /// Zoom change per wheel notch or toolbar click. Default: **0.1**.
    pub zoom_step: f64,

    /// Grid line spacing in document pixels. Default: **20**.
    pub grid_size: f64,

    /// Side of a square resize handle in document pixels. Default: **8**.
    pub handle_size: f64,

    /// Extra hit margin around each handle. Default: **4**.
    pub handle_tolerance: f64,

    /// Width/height floor applied by generic updates. Default: **10**.
    pub min_component_size: f64,

    /// Width/height floor applied by interactive resizing. Default: **20**.
    pub min_resize_size: f64,

    /// Offset of an Alt-drag duplicate from its source. Default: **20**.
    pub duplicate_offset: f64,

    /// Maximum number of history snapshots kept; `0` = unbounded.
    /// Default: **200**.
    pub history_depth: usize,

    /// Collapse all updates of one drag/resize gesture into a single
    /// history entry. When `false`, every pointer move is its own entry.
    /// Default: **true**.
    pub coalesce_gestures: bool,

    /// Canvas size before any template is loaded. Default: **800 × 600**.
    pub default_canvas_width: f64,
    pub default_canvas_height: f64,

    /// Canvas background before any theme is applied. Default: `#ffffff`.
    pub default_background: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 3.0,
            zoom_step: 0.1,
            grid_size: 20.0,
            handle_size: 8.0,
            handle_tolerance: 4.0,
            min_component_size: 10.0,
            min_resize_size: 20.0,
            duplicate_offset: 20.0,
            history_depth: 200,
            coalesce_gestures: true,
            default_canvas_width: 800.0,
            default_canvas_height: 600.0,
            default_background: "#ffffff".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the JSON is malformed or a limit is
    /// inconsistent (e.g. `minZoom > maxZoom`).
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the limits describe a usable editor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} is empty or non-positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(ConfigError::Invalid("zoomStep must be positive".into()));
        }
        if self.grid_size <= 0.0 {
            return Err(ConfigError::Invalid("gridSize must be positive".into()));
        }
        if self.handle_size <= 0.0 || self.handle_tolerance < 0.0 {
            return Err(ConfigError::Invalid(
                "handle size must be positive and tolerance non-negative".into(),
            ));
        }
        if self.min_component_size < 0.0 || self.min_resize_size < 0.0 {
            return Err(ConfigError::Invalid("minimum sizes must be non-negative".into()));
        }
        if self.default_canvas_width <= 0.0 || self.default_canvas_height <= 0.0 {
            return Err(ConfigError::Invalid("default canvas size must be positive".into()));
        }
        Ok(())
    }

    /// Clamp a zoom factor into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
