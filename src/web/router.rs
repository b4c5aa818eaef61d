//! # Router
//!
//! Assembles the HTTP surface:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /thumbnails/{dims}/{*url}` | [`thumbnail_handler`] |
//! | `GET /metrics` | [`metrics_handler`] |
//! | `GET /health` | `ok` |
//! | anything else | [`not_found`] |
//!
//! Shared services are injected as [`Extension`] layers; every request is
//! traced by `tower_http`'s [`TraceLayer`].

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::fallback::not_found;
use super::metrics_handler::metrics_handler;
use super::thumbnail_handler::thumbnail_handler;
use crate::metrics::prometheus::PrometheusMetrics;
use crate::thumbnail::service::ThumbnailService;

pub fn build_router(service: Arc<ThumbnailService>, metrics: Arc<PrometheusMetrics>) -> Router {
    Router::new()
        .route("/thumbnails/{dims}/{*url}", get(thumbnail_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(service))
                .layer(Extension(metrics)),
        )
}

async fn health() -> &'static str {
    "ok"
}
