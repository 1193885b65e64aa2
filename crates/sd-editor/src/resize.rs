//! Handle-driven resizing.
//!
//! Each handle moves at most one edge per axis. Moving the far edge (`e`,
//! `s`) only changes the length; moving the near edge (`w`, `n`) changes
//! the length and shifts the origin so the far edge stays put. Lengths are
//! floored at the minimum size and the result is kept inside the canvas.

use kurbo::Vec2;
use sd_core::model::{CanvasSize, Frame};
use sd_render::hit::Handle;

/// Which edge of one axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Axis untouched.
    Fixed,
    /// Near edge (left / top): origin moves, far edge is pinned.
    Near,
    /// Far edge (right / bottom): origin is pinned.
    Far,
}

/// `(horizontal, vertical)` edge per handle.
const fn edges(handle: Handle) -> (Edge, Edge) {
    match handle {
        Handle::Nw => (Edge::Near, Edge::Near),
        Handle::N => (Edge::Fixed, Edge::Near),
        Handle::Ne => (Edge::Far, Edge::Near),
        Handle::E => (Edge::Far, Edge::Fixed),
        Handle::Se => (Edge::Far, Edge::Far),
        Handle::S => (Edge::Fixed, Edge::Far),
        Handle::Sw => (Edge::Near, Edge::Far),
        Handle::W => (Edge::Near, Edge::Fixed),
    }
}

/// Resize one axis. Returns `(origin, length)`.
fn resize_axis(edge: Edge, pos: f64, len: f64, delta: f64, limit: f64, min: f64) -> (f64, f64) {
    let (pos, len) = match edge {
        Edge::Fixed => (pos, len),
        Edge::Far => (pos, (len + delta).min(limit - pos).max(min)),
        Edge::Near => {
            let far = pos + len;
            let new_len = (len - delta).min(far).max(min);
            (far - new_len, new_len)
        }
    };
    let len = len.min(limit);
    (pos.min(limit - len).max(0.0), len)
}

/// Apply a handle drag of `delta` (current pointer − start pointer) to the
/// frame captured at gesture start.
pub fn resize_frame(
    handle: Handle,
    start: &Frame,
    delta: Vec2,
    canvas: CanvasSize,
    min_size: f64,
) -> Frame {
    let (h, v) = edges(handle);
    let (x, width) = resize_axis(h, start.x, start.width, delta.x, canvas.width, min_size);
    let (y, height) = resize_axis(v, start.y, start.height, delta.y, canvas.height, min_size);
    Frame::new(x, y, width, height)
}
