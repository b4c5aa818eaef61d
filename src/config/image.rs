//! # Image Configuration
//!
//! Limits on requested thumbnail bounding boxes and the fixed JPEG quality
//! used when re-encoding.
//!
//! # Example
//! ```rust
//! use thumbcache::config::image::ImageConfig;
//!
//! let cfg = ImageConfig::default();
//! assert_eq!(cfg.max_width, 4096);
//! assert_eq!(cfg.jpeg_quality, 75);
//! ```

use super::env::read_u32_from;

/// Configuration for thumbnail generation and request validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageConfig {
    /// Largest `max_width` a request may ask for.
    pub max_width: u32,
    /// Largest `max_height` a request may ask for.
    pub max_height: u32,
    /// JPEG encoder quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 4096,
            max_height: 4096,
            jpeg_quality: 75,
        }
    }
}

impl ImageConfig {
    /// Reads `THUMBNAIL_MAX_WIDTH`, `THUMBNAIL_MAX_HEIGHT` and `JPEG_QUALITY`.
    ///
    /// Quality is clamped into `1..=100`.
    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let quality = read_u32_from(&provider, "JPEG_QUALITY", d.jpeg_quality as u32).clamp(1, 100);
        Self {
            max_width: read_u32_from(&provider, "THUMBNAIL_MAX_WIDTH", d.max_width),
            max_height: read_u32_from(&provider, "THUMBNAIL_MAX_HEIGHT", d.max_height),
            jpeg_quality: quality as u8,
        }
    }
}
