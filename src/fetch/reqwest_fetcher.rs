//! # HTTP Origin Fetcher
//!
//! [`OriginFetcher`] backed by a shared [`reqwest::Client`].
//!
//! - Only absolute `http`/`https` URLs are accepted.
//! - Non-2xx answers become [`FetchError`] with the status code.
//! - Bodies larger than the configured limit are rejected, both up front via
//!   `Content-Length` and while streaming.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Url};
use tracing::debug;

use super::origin::OriginFetcher;
use crate::config::fetch::FetchConfig;
use crate::error::thumbnail::FetchError;

#[derive(Clone, Debug)]
pub struct ReqwestFetcher {
    client: Client,
    max_bytes: u64,
}

impl ReqwestFetcher {
    /// Builds a client with the configured timeout and user agent.
    pub fn new(cfg: &FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            max_bytes: cfg.max_bytes,
        })
    }
}

/// Parses `url` and requires an absolute http(s) URL with a host.
pub fn parse_origin_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::rejected(format!("invalid url: {e}")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        scheme => Err(FetchError::rejected(format!(
            "invalid url: unsupported scheme or missing host ({scheme})"
        ))),
    }
}

#[async_trait]
impl OriginFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = parse_origin_url(url)?;

        let mut resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("non-success status"),
            ));
        }

        if let Some(len) = resp.content_length() {
            if len > self.max_bytes {
                return Err(FetchError::rejected(format!(
                    "body of {len} bytes exceeds limit {}",
                    self.max_bytes
                )));
            }
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?
        {
            if (buf.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(FetchError::rejected(format!(
                    "body exceeds limit {}",
                    self.max_bytes
                )));
            }
            buf.extend_from_slice(&chunk);
        }

        debug!(url, bytes = buf.len(), "fetched origin");
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn fetcher(max_bytes: u64) -> ReqwestFetcher {
        ReqwestFetcher::new(&FetchConfig {
            timeout: Duration::from_secs(5),
            max_bytes,
            user_agent: "thumbcache-test".into(),
        })
        .unwrap()
    }

    #[test]
    fn parse_origin_url_accepts_http_and_https_only() {
        assert!(parse_origin_url("https://example.com/a.png").is_ok());
        assert!(parse_origin_url("http://127.0.0.1:8080/x").is_ok());

        let e = parse_origin_url("ftp://example.com/a.png").unwrap_err();
        assert!(e.cause.starts_with("invalid url"));
        assert!(!e.is_transient());
        assert!(parse_origin_url("/relative/path.png").is_err());
        assert!(parse_origin_url("").is_err());
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let base = serve(Router::new().route("/a.png", get(|| async { "pixels" }))).await;

        let body = fetcher(1024).fetch(&format!("{base}/a.png")).await.unwrap();

        assert_eq!(&body[..], b"pixels");
    }

    #[tokio::test]
    async fn fetch_maps_status_errors() {
        let base = serve(
            Router::new()
                .route("/gone", get(|| async { StatusCode::NOT_FOUND }))
                .route("/boom", get(|| async { StatusCode::BAD_GATEWAY })),
        )
        .await;
        let f = fetcher(1024);

        let e = f.fetch(&format!("{base}/gone")).await.unwrap_err();
        assert_eq!(e.status, Some(404));
        assert!(!e.is_transient());

        let e = f.fetch(&format!("{base}/boom")).await.unwrap_err();
        assert_eq!(e.status, Some(502));
        assert!(e.is_transient());
    }

    #[tokio::test]
    async fn fetch_rejects_oversized_body() {
        let base = serve(Router::new().route("/big", get(|| async { vec![0u8; 4096] }))).await;

        let e = fetcher(100).fetch(&format!("{base}/big")).await.unwrap_err();

        assert!(e.cause.contains("exceeds limit"), "{e}");
        assert_eq!(e.status, None);
        assert!(!e.is_transient());
    }

    #[tokio::test]
    async fn fetch_rejects_streamed_body_over_limit() {
        let body = || async {
            let chunks = futures::stream::iter(
                (0..8).map(|_| Ok::<_, std::io::Error>(bytes::Bytes::from(vec![1u8; 64]))),
            );
            axum::body::Body::from_stream(chunks)
        };
        let base = serve(Router::new().route("/stream", get(body))).await;

        let e = fetcher(100).fetch(&format!("{base}/stream")).await.unwrap_err();

        assert_eq!(e.status, None);
        assert!(!e.is_transient());
    }

    #[tokio::test]
    async fn fetch_reports_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let e = fetcher(1024).fetch(&format!("http://{addr}/x")).await.unwrap_err();

        assert_eq!(e.status, None);
        assert!(e.is_transient());
    }
}
