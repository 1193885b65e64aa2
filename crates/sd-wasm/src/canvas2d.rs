//! `DrawingSurface` on top of an HTML `<canvas>` 2D context.

use kurbo::{BezPath, PathEl, Point, Rect, Vec2};
use sd_render::images::ImageHandle;
use sd_render::surface::{DrawingSurface, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use std::collections::HashMap;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Decoded images uploaded to offscreen canvases, keyed by pixel buffer
/// address. The image cache never evicts, so addresses stay unique.
#[derive(Default)]
pub struct BlitCache {
    canvases: HashMap<usize, HtmlCanvasElement>,
}

impl BlitCache {
    fn get_or_upload(&mut self, image: &ImageHandle) -> Option<&HtmlCanvasElement> {
        let key = image.pixels().as_ptr() as usize;
        if !self.canvases.contains_key(&key) {
            match upload(image) {
                Ok(canvas) => {
                    self.canvases.insert(key, canvas);
                }
                Err(e) => {
                    log::warn!("image upload failed: {e:?}");
                    return None;
                }
            }
        }
        self.canvases.get(&key)
    }
}

fn upload(image: &ImageHandle) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(image.width());
    canvas.set_height(image.height());
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(image.pixels()),
        image.width(),
        image.height(),
    )?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    Ok(canvas)
}

pub struct Canvas2dSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    blits: &'a mut BlitCache,
}

impl<'a> Canvas2dSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, blits: &'a mut BlitCache) -> Self {
        Self { ctx, blits }
    }

    fn set_dash(&self, dash: &[f64]) {
        let pattern: js_sys::Array = dash.iter().map(|d| JsValue::from_f64(*d)).collect();
        let _ = self.ctx.set_line_dash(&pattern);
    }

    fn trace(&self, path: &BezPath) {
        let ctx = self.ctx;
        ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathEl::ClosePath => ctx.close_path(),
            }
        }
    }
}

impl DrawingSurface for Canvas2dSurface<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.save();
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.restore();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn scale(&mut self, factor: f64) {
        let _ = self.ctx.scale(factor, factor);
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x, offset.y);
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        if radius > 0.0 {
            rounded_rect_path(self.ctx, rect, radius);
            self.ctx.fill();
        } else {
            self.ctx
                .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
        }
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
        self.set_dash(stroke.dash);
        if radius > 0.0 {
            rounded_rect_path(self.ctx, rect, radius);
            self.ctx.stroke();
        } else {
            self.ctx
                .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
        }
        if !stroke.dash.is_empty() {
            self.set_dash(&[]);
        }
    }

    fn fill_path(&mut self, path: &BezPath, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.trace(path);
        self.ctx.fill();
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
        self.set_dash(stroke.dash);
        self.trace(path);
        self.ctx.stroke();
        if !stroke.dash.is_empty() {
            self.set_dash(&[]);
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.ctx.set_font(&style.css_font());
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        self.ctx.set_text_baseline(match style.baseline {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
        });
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, clip_radius: f64) {
        let Some(source) = self.blits.get_or_upload(image) else {
            return;
        };
        self.ctx.save();
        rounded_rect_path(self.ctx, dest, clip_radius);
        self.ctx.clip();
        let _ = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            source,
            dest.x0,
            dest.y0,
            dest.width(),
            dest.height(),
        );
        self.ctx.restore();
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, r: f64) {
    let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
