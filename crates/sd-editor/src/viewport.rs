//! Viewport: zoom, pan and the screen ↔ document transform.
//!
//! The surface is drawn with `scale(zoom)` followed by `translate(pan)`,
//! so a document point `d` lands on screen at `zoom * (d + pan)`.

use kurbo::{Affine, Point, Size, Vec2};
use sd_core::config::EditorConfig;
use sd_core::model::CanvasSize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vec2,
    /// Surface size in screen pixels; zero until the host reports it.
    pub size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            size: Size::ZERO,
        }
    }
}

impl Viewport {
    /// Document → screen.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(self.pan)
    }

    pub fn screen_to_document(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.pan.x * self.zoom) / self.zoom,
            (p.y - self.pan.y * self.zoom) / self.zoom,
        )
    }

    pub fn document_to_screen(&self, p: Point) -> Point {
        self.transform() * p
    }

    /// Set the zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64, config: &EditorConfig) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = config.clamp_zoom(zoom);
    }

    pub fn zoom_by(&mut self, delta: f64, config: &EditorConfig) {
        self.set_zoom(self.zoom + delta, config);
    }

    /// Zoom change for one wheel notch: scrolling down zooms out.
    pub fn wheel_delta(delta_y: f64, step: f64) -> f64 {
        if delta_y > 0.0 {
            -step
        } else if delta_y < 0.0 {
            step
        } else {
            0.0
        }
    }

    /// Recompute pan so the canvas sits in the middle of the viewport.
    pub fn center_on(&mut self, canvas: CanvasSize) {
        self.pan = Vec2::new(
            self.size.width / 2.0 - canvas.width * self.zoom / 2.0,
            self.size.height / 2.0 - canvas.height * self.zoom / 2.0,
        );
    }

    /// Zoom as a rounded percentage for the toolbar.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}
