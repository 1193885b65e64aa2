pub mod hit;
pub mod images;
pub mod paint;
pub mod surface;
pub mod theme;

pub use hit::{Handle, component_at, handle_rect, resize_handle_at};
pub use images::{ImageCache, ImageError, ImageHandle, ImageState};
pub use paint::{RenderInput, RenderReport, render_document};
pub use surface::{DrawCall, DrawingSurface, RecordingSurface, StrokeStyle, TextAlign, TextBaseline, TextStyle};
pub use theme::{CanvasTheme, ThemeMode};
