//! # Metrics Sink
//!
//! Components receive an `Arc<dyn ThumbnailMetrics>` at construction instead
//! of touching process-wide counters. Labels are the requested bounding box.

use std::time::Duration;

pub trait ThumbnailMetrics: Send + Sync {
    /// A thumbnail request passed validation.
    fn request_received(&self, max_width: u32, max_height: u32);

    /// A job started fetch + resize work (cache miss).
    fn transform_started(&self, max_width: u32, max_height: u32);

    /// A job finished, successfully or not.
    fn transform_finished(&self, max_width: u32, max_height: u32, elapsed: Duration);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetrics;

impl ThumbnailMetrics for NoopMetrics {
    fn request_received(&self, _max_width: u32, _max_height: u32) {}
    fn transform_started(&self, _max_width: u32, _max_height: u32) {}
    fn transform_finished(&self, _max_width: u32, _max_height: u32, _elapsed: Duration) {}
}
