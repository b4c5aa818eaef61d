//! # Thumbnail Service
//!
//! Entry point behind the HTTP route: validates a request, counts it and asks
//! the [`ThumbnailCoordinator`] for the bytes.
//!
//! Every failure after validation collapses to [`ThumbnailResponse::NotFound`].
//! The cause is logged for operators and never returned to the client.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use super::coordinator::ThumbnailCoordinator;
use super::key::ThumbnailSpec;
use crate::config::image::ImageConfig;
use crate::error::thumbnail::{EnsureError, ValidationError};
use crate::fetch::reqwest_fetcher::parse_origin_url;
use crate::metrics::sink::ThumbnailMetrics;

#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailResponse {
    /// Encoded JPEG.
    Image(Bytes),
    NotFound,
    Invalid(ValidationError),
}

pub struct ThumbnailService {
    coordinator: ThumbnailCoordinator,
    metrics: Arc<dyn ThumbnailMetrics>,
    limits: ImageConfig,
    wait_timeout: Duration,
}

impl ThumbnailService {
    pub fn new(
        coordinator: ThumbnailCoordinator,
        metrics: Arc<dyn ThumbnailMetrics>,
        limits: ImageConfig,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            coordinator,
            metrics,
            limits,
            wait_timeout,
        }
    }

    pub async fn handle(&self, url: &str, max_width: u32, max_height: u32) -> ThumbnailResponse {
        let spec = match validate(url, max_width, max_height, &self.limits) {
            Ok(spec) => spec,
            Err(e) => {
                info!(url, max_width, max_height, error = %e, "rejected thumbnail request");
                return ThumbnailResponse::Invalid(e);
            }
        };

        self.metrics.request_received(max_width, max_height);

        match self.coordinator.ensure(&spec, self.wait_timeout).await {
            Ok(bytes) => ThumbnailResponse::Image(bytes),
            Err(e) => {
                match &e {
                    EnsureError::Timeout(_) => {
                        warn!(url, max_width, max_height, error = %e, "thumbnail not ready in time")
                    }
                    _ => warn!(url, max_width, max_height, error = %e, "thumbnail unavailable"),
                }
                ThumbnailResponse::NotFound
            }
        }
    }
}

/// Checks request input and builds the spec it names.
pub fn validate(
    url: &str,
    max_width: u32,
    max_height: u32,
    limits: &ImageConfig,
) -> Result<ThumbnailSpec, ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if max_width == 0 || max_height == 0 {
        return Err(ValidationError::Dimensions(format!(
            "{max_height}x{max_width}: both sides must be positive"
        )));
    }
    if max_width > limits.max_width {
        return Err(ValidationError::TooLarge {
            dimension: "max_width",
            value: max_width,
            limit: limits.max_width,
        });
    }
    if max_height > limits.max_height {
        return Err(ValidationError::TooLarge {
            dimension: "max_height",
            value: max_height,
            limit: limits.max_height,
        });
    }
    parse_origin_url(url).map_err(|e| ValidationError::MalformedUrl(e.cause))?;

    Ok(ThumbnailSpec::new(url, max_width, max_height))
}
