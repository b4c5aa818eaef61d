//! # Prometheus Metrics
//!
//! [`ThumbnailMetrics`] backed by a private [`Registry`], rendered by the
//! `/metrics` endpoint in text exposition format.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `resize_image_request_count` | counter | `max_width`, `max_height` |
//! | `resize_image_process_count` | counter | `max_width`, `max_height` |
//! | `resize_image_process_time` | histogram (seconds) | `max_width`, `max_height` |
//! | `thumbnails_info` | gauge (always 1) | `version`, `language`, `framework` |

use std::time::Duration;

use anyhow::Context;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use super::sink::ThumbnailMetrics;

const LABELS: &[&str] = &["max_width", "max_height"];

#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    request_count: IntCounterVec,
    process_count: IntCounterVec,
    process_time: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let request_count = IntCounterVec::new(
            Opts::new("resize_image_request_count", "Number of resize image requests."),
            LABELS,
        )?;
        let process_count = IntCounterVec::new(
            Opts::new("resize_image_process_count", "Number of resize image processes."),
            LABELS,
        )?;
        let process_time = HistogramVec::new(
            HistogramOpts::new("resize_image_process_time", "Time spent processing image.")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            LABELS,
        )?;
        let info = IntGaugeVec::new(
            Opts::new("thumbnails_info", "Thumbnail service information."),
            &["version", "language", "framework"],
        )?;
        info.with_label_values(&[env!("CARGO_PKG_VERSION"), "rust", "axum"])
            .set(1);

        registry.register(Box::new(request_count.clone()))?;
        registry.register(Box::new(process_count.clone()))?;
        registry.register(Box::new(process_time.clone()))?;
        registry.register(Box::new(info))?;

        Ok(Self {
            registry,
            request_count,
            process_count,
            process_time,
        })
    }

    /// Renders every registered metric in text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buf)
            .context("encode metrics")?;
        String::from_utf8(buf).context("metrics are not utf-8")
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

fn labels(w: u32, h: u32) -> [String; 2] {
    [w.to_string(), h.to_string()]
}

impl ThumbnailMetrics for PrometheusMetrics {
    fn request_received(&self, max_width: u32, max_height: u32) {
        let [w, h] = labels(max_width, max_height);
        self.request_count.with_label_values(&[&w, &h]).inc();
    }

    fn transform_started(&self, max_width: u32, max_height: u32) {
        let [w, h] = labels(max_width, max_height);
        self.process_count.with_label_values(&[&w, &h]).inc();
    }

    fn transform_finished(&self, max_width: u32, max_height: u32, elapsed: Duration) {
        let [w, h] = labels(max_width, max_height);
        self.process_time
            .with_label_values(&[&w, &h])
            .observe(elapsed.as_secs_f64());
    }
}
