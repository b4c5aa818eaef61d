use std::sync::Arc;

use axum::{
    Extension,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::metrics::prometheus::PrometheusMetrics;

/// `GET /metrics` in Prometheus text exposition format.
pub async fn metrics_handler(Extension(metrics): Extension<Arc<PrometheusMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, metrics.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
