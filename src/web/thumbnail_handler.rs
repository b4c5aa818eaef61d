//! # Thumbnail Handler
//!
//! `GET /thumbnails/{maxHeight}x{maxWidth}/{*url}`
//!
//! The source URL travels unescaped in the path, so the handler repairs what
//! routing does to it before validation:
//! - the trailing `/` of the historical route form is dropped,
//! - a scheme collapsed by a proxy (`https:/host`) gets its second slash back,
//! - the raw query string belongs to the source URL and is appended.
//!
//! ## Responses
//! - `200 OK`, `Content-Type: image/jpeg`, JPEG body
//! - `400 Bad Request` for malformed dimensions or URL
//! - `404 Not Found`, body `Not Found`, when no thumbnail could be produced

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, RawQuery},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::thumbnail::ValidationError;
use crate::image::processor::THUMBNAIL_CONTENT_TYPE;
use crate::thumbnail::service::{ThumbnailResponse, ThumbnailService};

pub async fn thumbnail_handler(
    Extension(service): Extension<Arc<ThumbnailService>>,
    Path((dims, url)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Response {
    let (max_height, max_width) = match parse_dimensions(&dims) {
        Ok(d) => d,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let url = source_url(&url, query.as_deref());

    match service.handle(&url, max_width, max_height).await {
        ThumbnailResponse::Image(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, THUMBNAIL_CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        ThumbnailResponse::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        ThumbnailResponse::Invalid(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// Parses `"{height}x{width}"` into `(height, width)`. Digits only.
pub fn parse_dimensions(segment: &str) -> Result<(u32, u32), ValidationError> {
    let bad = || ValidationError::Dimensions(format!("expected HEIGHTxWIDTH, got {segment:?}"));

    let (h, w) = segment.split_once('x').ok_or_else(bad)?;
    let number = |s: &str| {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        s.parse::<u32>().map_err(|_| bad())
    };

    Ok((number(h)?, number(w)?))
}

/// Rebuilds the source URL from the wildcard path segment and query.
pub fn source_url(raw: &str, query: Option<&str>) -> String {
    let trimmed = raw.strip_suffix('/').unwrap_or(raw);

    let mut url = String::with_capacity(trimmed.len() + 1);
    for scheme in ["https:/", "http:/"] {
        if let Some(rest) = trimmed.strip_prefix(scheme) {
            if !rest.starts_with('/') {
                url.push_str(scheme);
                url.push('/');
                url.push_str(rest);
            }
            break;
        }
    }
    if url.is_empty() {
        url.push_str(trimmed);
    }

    if let Some(q) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(q);
    }
    url
}
