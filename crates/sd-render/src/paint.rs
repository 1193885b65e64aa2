//! Document → drawing-surface calls.
//!
//! Paint order: clear, viewport transform, canvas background, grid,
//! canvas boundary, components in array order, selection overlay, and the
//! duplicate hint. The painter never mutates anything; image sources it
//! could not draw yet are reported back so the caller can request them.

use crate::hit::{Handle, handle_rect};
use crate::images::{ImageCache, ImageState};
use crate::surface::{DrawingSurface, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use crate::theme::CanvasTheme;
use kurbo::{BezPath, Point, Rect, Size, Vec2};
use sd_core::id::ComponentId;
use sd_core::model::{
    ButtonProps, ComponentKind, Document, Frame, ImageProps, InputProps, PlacedComponent, TextProps,
};

const SELECTION_DASH: [f64; 2] = [5.0, 5.0];
const HINT_DASH: [f64; 2] = [10.0, 5.0];
const IMAGE_PLACEHOLDER: &str = "🖼️";
const DUPLICATE_HINT: &str = "Alt + Drag to duplicate";

/// Everything a frame needs besides the surface and image cache.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    pub document: &'a Document,
    pub selection: Option<ComponentId>,
    pub zoom: f64,
    pub pan: Vec2,
    /// Surface size in device pixels.
    pub surface_size: Size,
    pub theme: &'a CanvasTheme,
    /// Alt is held: show the duplicate hint (only with a selection).
    pub duplicate_mode: bool,
    pub grid_size: f64,
    pub handle_size: f64,
}

#[derive(Debug, Default, PartialEq)]
pub struct RenderReport {
    /// Image sources seen for the first time; the caller should request them.
    pub unrequested_images: Vec<String>,
}

fn to_rect(f: &Frame) -> Rect {
    Rect::new(f.x, f.y, f.right(), f.bottom())
}

/// Paint one frame.
pub fn render_document<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    input: &RenderInput,
    images: &ImageCache,
) -> RenderReport {
    let mut report = RenderReport::default();
    let doc = input.document;
    let theme = input.theme;
    let (cw, ch) = (doc.canvas_size.width, doc.canvas_size.height);

    surface.clear(input.surface_size.width, input.surface_size.height);

    surface.save();
    surface.scale(input.zoom);
    surface.translate(input.pan);

    surface.fill_rect(Rect::new(0.0, 0.0, cw, ch), 0.0, &doc.background_color);
    draw_grid(surface, cw, ch, input.grid_size, theme);
    surface.stroke_rect(
        Rect::new(0.0, 0.0, cw, ch),
        0.0,
        &StrokeStyle::solid(theme.boundary, 2.0),
    );

    for component in &doc.components {
        draw_component(surface, component, theme, images, &mut report);
    }

    let selected = input.selection.and_then(|id| doc.get(id));
    if let Some(component) = selected {
        draw_selection(surface, &component.frame, input.handle_size, theme);
    }

    if input.duplicate_mode && selected.is_some() {
        draw_duplicate_hint(surface, theme);
    }

    surface.restore();
    report
}

fn draw_grid<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    width: f64,
    height: f64,
    spacing: f64,
    theme: &CanvasTheme,
) {
    if spacing <= 0.0 {
        return;
    }
    let mut path = BezPath::new();
    let mut x = 0.0;
    while x < width {
        path.move_to((x, 0.0));
        path.line_to((x, height));
        x += spacing;
    }
    let mut y = 0.0;
    while y < height {
        path.move_to((0.0, y));
        path.line_to((width, y));
        y += spacing;
    }
    surface.stroke_path(&path, &StrokeStyle::solid(theme.grid, 1.0));
}

// ─── Components ──────────────────────────────────────────────────────────

fn draw_component<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    component: &PlacedComponent,
    theme: &CanvasTheme,
    images: &ImageCache,
    report: &mut RenderReport,
) {
    let rect = to_rect(&component.frame);
    match &component.kind {
        ComponentKind::Button(p) => draw_button(surface, rect, p),
        ComponentKind::Text(p) => draw_text(surface, rect, p, theme),
        ComponentKind::Input(p) => draw_input(surface, rect, p, theme),
        ComponentKind::Image(p) => draw_image(surface, rect, p, theme, images, report),
    }
}

fn draw_button<S: DrawingSurface + ?Sized>(surface: &mut S, rect: Rect, p: &ButtonProps) {
    let radius = p.border_radius.unwrap_or(6.0);
    surface.fill_rect(rect, radius, p.background_color.as_deref().unwrap_or("#3b82f6"));
    surface.fill_text(
        p.text.as_deref().unwrap_or("Button"),
        rect.center(),
        &TextStyle {
            font_px: p.font_size.unwrap_or(14.0),
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            color: p.text_color.as_deref().unwrap_or("#ffffff"),
        },
    );
}

fn draw_text<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    rect: Rect,
    p: &TextProps,
    theme: &CanvasTheme,
) {
    surface.fill_text(
        p.text.as_deref().unwrap_or("Text"),
        rect.origin(),
        &TextStyle {
            font_px: p.font_size.unwrap_or(16.0),
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            color: p.text_color.as_deref().unwrap_or(theme.text),
        },
    );
}

fn draw_input<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    rect: Rect,
    p: &InputProps,
    theme: &CanvasTheme,
) {
    let radius = p.border_radius.unwrap_or(4.0);
    surface.fill_rect(rect, radius, p.background_color.as_deref().unwrap_or(theme.input_bg));
    surface.stroke_rect(rect, radius, &StrokeStyle::solid(theme.input_border, 1.0));
    surface.fill_text(
        p.placeholder.as_deref().unwrap_or("Input"),
        Point::new(rect.x0 + 8.0, rect.center().y),
        &TextStyle {
            font_px: p.font_size.unwrap_or(14.0),
            align: TextAlign::Left,
            baseline: TextBaseline::Middle,
            color: theme.placeholder_text,
        },
    );
}

fn draw_image<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    rect: Rect,
    p: &ImageProps,
    theme: &CanvasTheme,
    images: &ImageCache,
    report: &mut RenderReport,
) {
    let radius = p.border_radius.unwrap_or(4.0);
    surface.fill_rect(rect, radius, theme.image_bg);
    surface.stroke_rect(rect, radius, &StrokeStyle::solid(theme.input_border, 1.0));

    let centred = |font_px| TextStyle {
        font_px,
        align: TextAlign::Center,
        baseline: TextBaseline::Middle,
        color: theme.placeholder_text,
    };

    let Some(src) = p.source() else {
        surface.fill_text(IMAGE_PLACEHOLDER, rect.center(), &centred(24.0));
        return;
    };

    match images.state(src) {
        ImageState::Ready(handle) => surface.draw_image(&handle, rect, radius),
        ImageState::Failed => surface.fill_text(IMAGE_PLACEHOLDER, rect.center(), &centred(24.0)),
        ImageState::Loading => surface.fill_text("Loading...", rect.center(), &centred(12.0)),
        ImageState::Unloaded => {
            if !report.unrequested_images.iter().any(|s| s == src) {
                report.unrequested_images.push(src.to_string());
            }
            surface.fill_text("Loading...", rect.center(), &centred(12.0));
        }
    }
}

// ─── Overlays ────────────────────────────────────────────────────────────

fn draw_selection<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    frame: &Frame,
    handle_size: f64,
    theme: &CanvasTheme,
) {
    log::trace!("selection overlay at ({}, {})", frame.x, frame.y);
    surface.stroke_rect(
        to_rect(frame).inflate(2.0, 2.0),
        0.0,
        &StrokeStyle::dashed(theme.selection, 2.0, &SELECTION_DASH),
    );

    let handle_stroke = StrokeStyle::solid(theme.handle_stroke, 1.0);
    for handle in Handle::ALL {
        let r = handle_rect(frame, handle, handle_size);
        surface.fill_rect(r, 0.0, theme.handle_fill);
        surface.stroke_rect(r, 0.0, &handle_stroke);
    }
}

fn draw_duplicate_hint<S: DrawingSurface + ?Sized>(surface: &mut S, theme: &CanvasTheme) {
    let r = Rect::new(10.0, 10.0, 210.0, 40.0);
    surface.fill_rect(r, 0.0, theme.hint_fill);
    surface.stroke_rect(r, 0.0, &StrokeStyle::dashed(theme.selection, 2.0, &HINT_DASH));
    surface.fill_text(
        DUPLICATE_HINT,
        Point::new(20.0, 25.0),
        &TextStyle {
            font_px: 14.0,
            align: TextAlign::Left,
            baseline: TextBaseline::Middle,
            color: theme.selection,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};
    use pretty_assertions::assert_eq;
    use sd_core::model::CanvasSize;

    fn doc_with(components: Vec<PlacedComponent>) -> Document {
        let mut doc = Document::new(CanvasSize::new(100.0, 60.0), "#ffffff");
        doc.replace_components(components, 10.0);
        doc
    }

    fn input<'a>(doc: &'a Document, theme: &'a CanvasTheme, selection: Option<ComponentId>) -> RenderInput<'a> {
        RenderInput {
            document: doc,
            selection,
            zoom: 2.0,
            pan: Vec2::new(5.0, 7.0),
            surface_size: Size::new(400.0, 300.0),
            theme,
            duplicate_mode: false,
            grid_size: 20.0,
            handle_size: 8.0,
        }
    }

    fn button(id: &str) -> PlacedComponent {
        PlacedComponent::new(
            ComponentId::intern(id),
            Frame::new(10.0, 10.0, 40.0, 20.0),
            ComponentKind::Button(ButtonProps::default()),
        )
    }

    #[test]
    fn frame_prologue_order() {
        let doc = doc_with(vec![]);
        let theme = CanvasTheme::light();
        let mut s = RecordingSurface::new();
        render_document(&mut s, &input(&doc, &theme, None), &ImageCache::new());

        assert_eq!(
            &s.calls[..4],
            &[
                DrawCall::Clear { width: 400.0, height: 300.0 },
                DrawCall::Save,
                DrawCall::Scale(2.0),
                DrawCall::Translate(Vec2::new(5.0, 7.0)),
            ]
        );
        assert_eq!(s.calls.last(), Some(&DrawCall::Restore));
        // 5 vertical + 3 horizontal grid lines, two path elements each
        assert!(s.calls.contains(&DrawCall::StrokePath {
            segments: 16,
            color: "#f3f4f6".into(),
            width: 1.0
        }));
    }

    #[test]
    fn button_defaults() {
        let doc = doc_with(vec![button("paint-btn")]);
        let theme = CanvasTheme::light();
        let mut s = RecordingSurface::new();
        render_document(&mut s, &input(&doc, &theme, None), &ImageCache::new());

        assert!(s.calls.contains(&DrawCall::FillRect {
            rect: Rect::new(10.0, 10.0, 50.0, 30.0),
            radius: 6.0,
            color: "#3b82f6".into()
        }));
        assert!(s.calls.contains(&DrawCall::Text {
            text: "Button".into(),
            at: Point::new(30.0, 20.0),
            font_px: 14.0,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            color: "#ffffff".into(),
        }));
    }

    #[test]
    fn selection_is_drawn_after_components() {
        let mut top = button("paint-top");
        top.frame = Frame::new(20.0, 20.0, 40.0, 20.0);
        let doc = doc_with(vec![button("paint-sel"), top]);
        let theme = CanvasTheme::light();
        let mut s = RecordingSurface::new();
        render_document(&mut s, &input(&doc, &theme, Some(ComponentId::intern("paint-sel"))), &ImageCache::new());

        let outline = s
            .calls
            .iter()
            .position(|c| matches!(c, DrawCall::StrokeRect { dash, .. } if dash == &SELECTION_DASH))
            .unwrap();
        let last_button = s
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Text { text, .. } if text == "Button"))
            .unwrap();
        assert!(outline > last_button);

        let dashed: Vec<_> = s
            .stroke_rects()
            .into_iter()
            .filter(|(_, _, dash)| !dash.is_empty())
            .collect();
        assert_eq!(dashed, vec![(Rect::new(8.0, 8.0, 52.0, 32.0), "#3b82f6", &SELECTION_DASH[..])]);

        let handles = s
            .fill_rects()
            .into_iter()
            .filter(|(r, color)| *color == "#3b82f6" && r.width() == 8.0)
            .count();
        assert_eq!(handles, 8);
    }

    #[test]
    fn duplicate_hint_needs_selection() {
        let doc = doc_with(vec![button("paint-hint")]);
        let theme = CanvasTheme::light();
        let mut s = RecordingSurface::new();
        let mut inp = input(&doc, &theme, None);
        inp.duplicate_mode = true;
        render_document(&mut s, &inp, &ImageCache::new());
        assert!(!s.texts().contains(&DUPLICATE_HINT));

        s.clear_calls();
        inp.selection = Some(ComponentId::intern("paint-hint"));
        render_document(&mut s, &inp, &ImageCache::new());
        assert!(s.texts().contains(&DUPLICATE_HINT));
    }

    #[test]
    fn unloaded_image_is_reported_once() {
        let image = |id: &str| {
            PlacedComponent::new(
                ComponentId::intern(id),
                Frame::new(0.0, 0.0, 30.0, 20.0),
                ComponentKind::Image(ImageProps {
                    src: Some("/a.png".into()),
                    ..ImageProps::default()
                }),
            )
        };
        let doc = doc_with(vec![image("paint-img-1"), image("paint-img-2")]);
        let theme = CanvasTheme::dark();
        let mut s = RecordingSurface::new();
        let report = render_document(&mut s, &input(&doc, &theme, None), &ImageCache::new());

        assert_eq!(report.unrequested_images, vec!["/a.png".to_string()]);
        assert_eq!(s.texts().iter().filter(|t| **t == "Loading...").count(), 2);
    }

    #[test]
    fn decoded_image_is_blitted_after_poll() {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;
        use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 4, Rgba([0, 128, 255, 255])))
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let src = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        let doc = doc_with(vec![PlacedComponent::new(
            ComponentId::intern("paint-decoded"),
            Frame::new(5.0, 6.0, 30.0, 20.0),
            ComponentKind::Image(ImageProps {
                src: Some(src.clone()),
                ..ImageProps::default()
            }),
        )]);
        let theme = CanvasTheme::light();
        let mut cache = ImageCache::new();
        let mut s = RecordingSurface::new();

        let report = render_document(&mut s, &input(&doc, &theme, None), &cache);
        assert!(s.texts().contains(&"Loading..."));
        assert!(s.images().is_empty());
        for requested in &report.unrequested_images {
            cache.request(requested);
        }
        assert!(cache.poll());

        s.clear_calls();
        let report = render_document(&mut s, &input(&doc, &theme, None), &cache);
        assert!(report.unrequested_images.is_empty());
        assert!(!s.texts().contains(&"Loading..."));
        assert_eq!(s.images(), vec![(Rect::new(5.0, 6.0, 35.0, 26.0), 4.0, (6, 4))]);
    }

    #[test]
    fn image_without_source_shows_placeholder() {
        let doc = doc_with(vec![PlacedComponent::new(
            ComponentId::intern("paint-empty"),
            Frame::new(0.0, 0.0, 30.0, 20.0),
            ComponentKind::Image(ImageProps::default()),
        )]);
        let theme = CanvasTheme::light();
        let mut s = RecordingSurface::new();
        let report = render_document(&mut s, &input(&doc, &theme, None), &ImageCache::new());
        assert!(report.unrequested_images.is_empty());
        assert!(s.texts().contains(&IMAGE_PLACEHOLDER));
    }
}
