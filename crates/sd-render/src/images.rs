//! Image cache for image components.
//!
//! Each source string moves through `Unloaded → Loading → Ready | Failed`.
//! The painter only reads the cache; loading results are posted to a
//! channel and applied on the next [`ImageCache::poll`], which tells the
//! caller whether a redraw is due. Failures are terminal: a failed source
//! keeps showing the placeholder and is never retried.
//!
//! `data:` URLs are decoded in-process. Any other source is queued in
//! `pending_fetches` for the host to fetch, then handed back through
//! [`ImageCache::complete`] or [`ImageCache::fail`].
//!
//! Entries are keyed by the full source string and never evicted, so a
//! `data:` URL stays in memory twice (as key and as bitmap) for the life
//! of the cache. Layouts hold a handful of images, and dropping an entry
//! would make the painter re-decode it on the next frame.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("malformed data URL")]
    MalformedDataUrl,

    #[error("only base64 data URLs are supported")]
    NotBase64,

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// A decoded bitmap, cheap to clone.
#[derive(Debug, Clone)]
pub struct ImageHandle(Arc<RgbaImage>);

impl ImageHandle {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decode PNG/JPEG/GIF/WebP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Row-major RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        self.0.as_raw()
    }
}

#[derive(Debug, Clone, Default)]
pub enum ImageState {
    #[default]
    Unloaded,
    Loading,
    Ready(ImageHandle),
    Failed,
}

type LoadResult = (String, Result<ImageHandle, ImageError>);

pub struct ImageCache {
    states: HashMap<String, ImageState>,
    pending_fetches: Vec<String>,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            states: HashMap::new(),
            pending_fetches: Vec::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self, src: &str) -> ImageState {
        self.states.get(src).cloned().unwrap_or_default()
    }

    /// Start loading `src` unless it is already known.
    pub fn request(&mut self, src: &str) {
        if self.states.contains_key(src) {
            return;
        }
        self.states.insert(src.to_string(), ImageState::Loading);

        if src.starts_with("data:") {
            let result = decode_data_url(src);
            self.post(src, result);
        } else {
            log::debug!("queueing image fetch for {src}");
            self.pending_fetches.push(src.to_string());
        }
    }

    /// Sources the host still has to fetch. Drains the queue.
    pub fn take_pending_fetches(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_fetches)
    }

    /// Hand back fetched bytes for `src`.
    pub fn complete(&mut self, src: &str, bytes: &[u8]) {
        self.post(src, ImageHandle::decode(bytes));
    }

    /// Report that fetching `src` failed.
    pub fn fail(&mut self, src: &str, reason: &str) {
        self.post(src, Err(ImageError::Fetch(reason.to_string())));
    }

    fn post(&self, src: &str, result: Result<ImageHandle, ImageError>) {
        // The receiver lives in `self`, so the send cannot fail.
        let _ = self.tx.send((src.to_string(), result));
    }

    /// Apply finished loads. Returns `true` if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((src, result)) = self.rx.try_recv() {
            if matches!(self.states.get(&src), Some(ImageState::Ready(_) | ImageState::Failed)) {
                continue;
            }
            let state = match result {
                Ok(handle) => {
                    log::debug!("image ready: {} ({}x{})", short(&src), handle.width(), handle.height());
                    ImageState::Ready(handle)
                }
                Err(e) => {
                    log::warn!("image failed: {}: {e}", short(&src));
                    ImageState::Failed
                }
            };
            self.states.insert(src, state);
            changed = true;
        }
        changed
    }
}

/// Truncate long data URLs for log lines.
fn short(src: &str) -> &str {
    match src.char_indices().nth(48) {
        Some((i, _)) => &src[..i],
        None => src,
    }
}

/// Decode a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> Result<ImageHandle, ImageError> {
    let rest = url.strip_prefix("data:").ok_or(ImageError::MalformedDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUrl)?;
    if !meta.ends_with(";base64") {
        return Err(ImageError::NotBase64);
    }
    let bytes = STANDARD.decode(payload.trim())?;
    ImageHandle::decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn png_data_url(w: u32, h: u32) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(w, h)))
    }

    #[test]
    fn data_url_is_ready_after_poll() {
        let mut cache = ImageCache::new();
        let url = png_data_url(3, 2);
        cache.request(&url);
        assert!(matches!(cache.state(&url), ImageState::Loading));
        assert!(cache.take_pending_fetches().is_empty());

        assert!(cache.poll());
        let ImageState::Ready(handle) = cache.state(&url) else {
            panic!("expected ready");
        };
        assert_eq!((handle.width(), handle.height()), (3, 2));
        assert_eq!(handle.pixels().len(), 3 * 2 * 4);
        assert!(!cache.poll());
    }

    #[test]
    fn remote_source_is_queued_once() {
        let mut cache = ImageCache::new();
        cache.request("/logo.png");
        cache.request("/logo.png");
        assert_eq!(cache.take_pending_fetches(), vec!["/logo.png".to_string()]);
        assert!(cache.take_pending_fetches().is_empty());

        cache.complete("/logo.png", &png_bytes(1, 1));
        assert!(cache.poll());
        assert!(matches!(cache.state("/logo.png"), ImageState::Ready(_)));
    }

    #[test]
    fn failure_is_terminal() {
        let mut cache = ImageCache::new();
        cache.request("data:image/png;base64,not-an-image");
        assert!(cache.poll());
        assert!(matches!(
            cache.state("data:image/png;base64,not-an-image"),
            ImageState::Failed
        ));

        // A later completion for the same source is ignored.
        cache.complete("data:image/png;base64,not-an-image", &png_bytes(1, 1));
        assert!(!cache.poll());
        cache.request("data:image/png;base64,not-an-image");
        assert!(matches!(
            cache.state("data:image/png;base64,not-an-image"),
            ImageState::Failed
        ));
    }

    #[test]
    fn fetch_failure_marks_failed() {
        let mut cache = ImageCache::new();
        cache.request("https://example.invalid/a.png");
        cache.fail("https://example.invalid/a.png", "404");
        assert!(cache.poll());
        assert!(matches!(cache.state("https://example.invalid/a.png"), ImageState::Failed));
    }

    #[test]
    fn non_base64_data_url_is_rejected() {
        assert!(matches!(
            decode_data_url("data:image/svg+xml,<svg/>"),
            Err(ImageError::NotBase64)
        ));
        assert!(matches!(decode_data_url("data:nocomma"), Err(ImageError::MalformedDataUrl)));
    }

    #[test]
    fn unknown_source_is_unloaded() {
        let cache = ImageCache::new();
        assert!(matches!(cache.state("never"), ImageState::Unloaded));
    }
}
