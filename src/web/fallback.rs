use axum::{http::StatusCode, response::IntoResponse};

/// Default 404 handler for every unrouted path.
///
/// Answers with the same `Not Found` body the thumbnail route uses when no
/// image can be produced, so clients see one shape of "absent".
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
