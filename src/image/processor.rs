//! # Image Processing Abstractions
//!
//! Defines the interface the job coordinator resizes through, plus the pure
//! bounding-box arithmetic every backend must honour.
//!
//! - [`ImageProcessor`]: decode, fit within a box, re-encode as JPEG.
//! - [`fit_within`]: output dimensions for a given source and bounding box.
//!
//! # Example
//! ```rust
//! use thumbcache::image::processor::fit_within;
//!
//! // 1000x500 source into a 100x100 box is width-bound.
//! assert_eq!(fit_within(1000, 500, 100, 100), (100, 50));
//! // Sources already inside the box are never enlarged.
//! assert_eq!(fit_within(80, 40, 100, 100), (80, 40));
//! ```

use crate::error::thumbnail::DecodeError;

/// MIME type of every encoded thumbnail.
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Trait defining thumbnail encoding behavior.
///
/// Implementations must be pure: no I/O and no shared mutable state, so the
/// coordinator can call them from any blocking worker.
pub trait ImageProcessor: Send + Sync {
    /// Decodes `img_bytes`, shrinks it to fit `max_w` x `max_h` preserving the
    /// aspect ratio, and re-encodes it as JPEG.
    ///
    /// # Errors
    /// [`DecodeError`] when the bytes are not a recognisable image or the
    /// result cannot be encoded.
    fn resize_to_jpeg(&self, img_bytes: &[u8], max_w: u32, max_h: u32)
    -> Result<Vec<u8>, DecodeError>;
}

/// Computes output dimensions that fit inside `max_w` x `max_h`.
///
/// The scale factor is `min(max_w / w, max_h / h)` clamped to `<= 1`; each
/// side is rounded to the nearest pixel and kept at least 1 and at most the
/// bound.
pub fn fit_within(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w == 0 || h == 0 || (w <= max_w && h <= max_h) {
        return (w, h);
    }
    let scale = f64::min(max_w as f64 / w as f64, max_h as f64 / h as f64);
    let side = |orig: u32, bound: u32| ((orig as f64 * scale).round() as u32).clamp(1, bound.max(1));
    (side(w, max_w), side(h, max_h))
}
