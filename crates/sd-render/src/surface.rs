//! Drawing-surface abstraction.
//!
//! The painter only talks to [`DrawingSurface`], a small immediate-mode
//! 2D context: rounded rects, paths, text, clipped image blits, and a
//! scale + translate transform stack. The browser implements it on top of
//! `CanvasRenderingContext2d`; tests use [`RecordingSurface`].

use crate::images::ImageHandle;
use kurbo::{BezPath, Point, Rect, Vec2};

/// Font family used for all canvas text.
pub const FONT_FAMILY: &str = "Arial";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub font_px: f64,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub color: &'a str,
}

impl TextStyle<'_> {
    /// CSS font shorthand, e.g. `14px Arial`.
    pub fn css_font(&self) -> String {
        format!("{}px {FONT_FAMILY}", self.font_px)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle<'a> {
    pub color: &'a str,
    pub width: f64,
    /// Dash pattern; empty = solid.
    pub dash: &'a [f64],
}

impl<'a> StrokeStyle<'a> {
    pub const fn solid(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dash: &[],
        }
    }

    pub const fn dashed(color: &'a str, width: f64, dash: &'a [f64]) -> Self {
        Self { color, width, dash }
    }
}

/// Host 2D drawing context.
///
/// Colors are CSS color strings. A `radius` of `0` means a plain rectangle.
pub trait DrawingSurface {
    /// Clear the whole surface (in device pixels, ignoring transforms).
    fn clear(&mut self, width: f64, height: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn scale(&mut self, factor: f64);
    fn translate(&mut self, offset: Vec2);
    fn fill_rect(&mut self, rect: Rect, radius: f64, color: &str);
    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle);
    fn fill_path(&mut self, path: &BezPath, color: &str);
    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle);
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
    /// Blit `image` scaled into `dest`, clipped to a rounded rect of `clip_radius`.
    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, clip_radius: f64);
}

// ─── Recording surface ───────────────────────────────────────────────────

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear { width: f64, height: f64 },
    Save,
    Restore,
    Scale(f64),
    Translate(Vec2),
    FillRect { rect: Rect, radius: f64, color: String },
    StrokeRect { rect: Rect, radius: f64, color: String, width: f64, dash: Vec<f64> },
    FillPath { segments: usize, color: String },
    StrokePath { segments: usize, color: String, width: f64 },
    Text { text: String, at: Point, font_px: f64, align: TextAlign, baseline: TextBaseline, color: String },
    Image { dest: Rect, clip_radius: f64, size: (u32, u32) },
}

/// A surface that records every call, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fill_rects(&self) -> Vec<(Rect, &str)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { rect, color, .. } => Some((*rect, color.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn stroke_rects(&self) -> Vec<(Rect, &str, &[f64])> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::StrokeRect {
                    rect, color, dash, ..
                } => Some((*rect, color.as_str(), dash.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Image blits as `(dest, clip_radius, bitmap size)`.
    pub fn images(&self) -> Vec<(Rect, f64, (u32, u32))> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image {
                    dest,
                    clip_radius,
                    size,
                } => Some((*dest, *clip_radius, *size)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn scale(&mut self, factor: f64) {
        self.calls.push(DrawCall::Scale(factor));
    }

    fn translate(&mut self, offset: Vec2) {
        self.calls.push(DrawCall::Translate(offset));
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: &str) {
        self.calls.push(DrawCall::FillRect {
            rect,
            radius,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle) {
        self.calls.push(DrawCall::StrokeRect {
            rect,
            radius,
            color: stroke.color.to_string(),
            width: stroke.width,
            dash: stroke.dash.to_vec(),
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: &str) {
        self.calls.push(DrawCall::FillPath {
            segments: path.elements().len(),
            color: color.to_string(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        self.calls.push(DrawCall::StrokePath {
            segments: path.elements().len(),
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            at,
            font_px: style.font_px,
            align: style.align,
            baseline: style.baseline,
            color: style.color.to_string(),
        });
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, clip_radius: f64) {
        self.calls.push(DrawCall::Image {
            dest,
            clip_radius,
            size: (image.width(), image.height()),
        });
    }
}
