//! Hit testing: point → component and point → resize handle.
//!
//! Components are scanned in reverse paint order, so the visually topmost
//! component wins where frames overlap. All coordinates are document space.

use kurbo::{Point, Rect};
use sd_core::id::ComponentId;
use sd_core::model::{Frame, PlacedComponent};

/// One of the eight resize handles around a selected frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    W,
    E,
}

impl Handle {
    /// Handles in hit-test priority order: corners first, then edges.
    pub const ALL: [Handle; 8] = [
        Self::Nw,
        Self::Ne,
        Self::Sw,
        Self::Se,
        Self::N,
        Self::S,
        Self::W,
        Self::E,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nw => "nw",
            Self::Ne => "ne",
            Self::Sw => "sw",
            Self::Se => "se",
            Self::N => "n",
            Self::S => "s",
            Self::W => "w",
            Self::E => "e",
        }
    }

    /// CSS cursor name shown while hovering or dragging this handle.
    pub fn cursor(&self) -> &'static str {
        match self {
            Self::Nw => "nw-resize",
            Self::Ne => "ne-resize",
            Self::Sw => "sw-resize",
            Self::Se => "se-resize",
            Self::N => "n-resize",
            Self::S => "s-resize",
            Self::W => "w-resize",
            Self::E => "e-resize",
        }
    }

    /// The point on `frame` this handle is centred on.
    pub fn anchor(&self, frame: &Frame) -> Point {
        let (x, y, w, h) = (frame.x, frame.y, frame.width, frame.height);
        match self {
            Self::Nw => Point::new(x, y),
            Self::Ne => Point::new(x + w, y),
            Self::Sw => Point::new(x, y + h),
            Self::Se => Point::new(x + w, y + h),
            Self::N => Point::new(x + w / 2.0, y),
            Self::S => Point::new(x + w / 2.0, y + h),
            Self::W => Point::new(x, y + h / 2.0),
            Self::E => Point::new(x + w, y + h / 2.0),
        }
    }
}

/// Find the topmost component containing `p`. `None` = empty canvas.
pub fn component_at(components: &[PlacedComponent], p: Point) -> Option<ComponentId> {
    components
        .iter()
        .rev()
        .find(|c| c.frame.contains(p.x, p.y))
        .map(|c| c.id)
}

/// The square drawn for `handle`, `size` wide, centred on its anchor.
pub fn handle_rect(frame: &Frame, handle: Handle, size: f64) -> Rect {
    Rect::from_center_size(handle.anchor(frame), (size, size))
}

/// Find the handle of `frame` under `p`, with `tolerance` extra margin on
/// every side of each handle square.
pub fn resize_handle_at(p: Point, frame: &Frame, size: f64, tolerance: f64) -> Option<Handle> {
    Handle::ALL.into_iter().find(|&h| {
        let r = handle_rect(frame, h, size).inflate(tolerance, tolerance);
        p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
    })
}
