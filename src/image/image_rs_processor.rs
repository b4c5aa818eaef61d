//! # Image Processor Implementation (image-rs)
//!
//! Provides an [`ImageProcessor`] implementation using the [`image`] crate.
//!
//! Any format the crate can sniff (JPEG, PNG, GIF, WebP, ...) is accepted as
//! input; output is always baseline JPEG at the configured quality. Alpha is
//! flattened by the RGB conversion.
//!
//! # Example
//! ```rust,no_run
//! use thumbcache::image::image_rs_processor::ImageRsProcessor;
//! use thumbcache::image::processor::ImageProcessor;
//!
//! let processor = ImageRsProcessor::default();
//! let src = std::fs::read("input.png").unwrap();
//! let jpeg = processor.resize_to_jpeg(&src, 200, 200).expect("resize ok");
//! std::fs::write("thumb.jpeg", jpeg).unwrap();
//! ```

use std::io::Cursor;

use image::{
    DynamicImage, GenericImageView, ImageReader, codecs::jpeg::JpegEncoder,
    imageops::FilterType,
};

use super::processor::{ImageProcessor, fit_within};
use crate::error::thumbnail::DecodeError;

/// A concrete implementation of [`ImageProcessor`] using the `image` crate.
#[derive(Clone, Debug)]
pub struct ImageRsProcessor {
    quality: u8,
}

impl Default for ImageRsProcessor {
    /// Quality 75, the common default of JPEG encoders.
    fn default() -> Self {
        Self { quality: 75 }
    }
}

impl ImageRsProcessor {
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl ImageProcessor for ImageRsProcessor {
    fn resize_to_jpeg(
        &self,
        img_bytes: &[u8],
        max_w: u32,
        max_h: u32,
    ) -> Result<Vec<u8>, DecodeError> {
        let img = ImageReader::new(Cursor::new(img_bytes))
            .with_guessed_format()
            .map_err(|e| DecodeError(format!("guess format: {e}")))?
            .decode()
            .map_err(|e| DecodeError(e.to_string()))?;

        let resized = resize_fit(img, max_w, max_h);

        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, self.quality);
        DynamicImage::ImageRgb8(resized.to_rgb8())
            .write_with_encoder(encoder)
            .map_err(|e| DecodeError(format!("encode jpeg: {e}")))?;

        Ok(out)
    }
}

/// Resizes the image proportionally to fit within the specified bounds.
///
/// Uses [`FilterType::Triangle`] for quality-speed balance.
fn resize_fit(img: DynamicImage, max_w: u32, max_h: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    let (tw, th) = fit_within(w, h, max_w, max_h);
    if (tw, th) == (w, h) {
        return img;
    }
    img.resize_exact(tw, th, FilterType::Triangle)
}
