//! # thumbcache
//!
//! On-demand image thumbnail cache with request coalescing.
//!
//! `GET /thumbnails/{maxHeight}x{maxWidth}/{url}` fetches the image at `url`,
//! shrinks it to fit the box, stores the JPEG and serves it. Concurrent
//! requests for the same thumbnail share one fetch and one resize.
//!
//! ## Layout
//! - `fetch`: origin retrieval (`reqwest`)
//! - `image`: decode, fit, JPEG encode (`image`)
//! - `thumbnail`: records, stores, job coordinator, request service
//! - `db`, `storage`: MySQL port and blob files behind the SQL store
//! - `metrics`: Prometheus counters and histograms
//! - `web`: axum router and handlers
//! - `config`, `error`, `time`: ambient plumbing
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use thumbcache::config::image::ImageConfig;
//! use thumbcache::fetch::reqwest_fetcher::ReqwestFetcher;
//! use thumbcache::image::image_rs_processor::ImageRsProcessor;
//! use thumbcache::metrics::sink::NoopMetrics;
//! use thumbcache::thumbnail::coordinator::ThumbnailCoordinator;
//! use thumbcache::thumbnail::memory_store::MemoryThumbnailStore;
//! use thumbcache::thumbnail::retry::RetryPolicy;
//! use thumbcache::thumbnail::service::ThumbnailService;
//! use thumbcache::time::system_clock::SystemClock;
//!
//! # async fn run() -> thumbcache::anyhow::Result<()> {
//! let coordinator = ThumbnailCoordinator::new(
//!     Arc::new(MemoryThumbnailStore::new(Arc::new(SystemClock))),
//!     Arc::new(ReqwestFetcher::new(&Default::default())?),
//!     Arc::new(ImageRsProcessor::default()),
//!     Arc::new(NoopMetrics),
//!     4,
//!     RetryPolicy::default(),
//! );
//! let service = ThumbnailService::new(
//!     coordinator,
//!     Arc::new(NoopMetrics),
//!     ImageConfig::default(),
//!     Duration::from_secs(30),
//! );
//! let _ = service.handle("https://example.com/a.png", 100, 100).await;
//! # Ok(())
//! # }
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use axum;
pub use bytes;
pub use chrono;
pub use dotenvy;
pub use mysql;
pub use prometheus;
pub use tokio;
pub use tower;
pub use tower_http;

// ===============================
// Public modules
// ===============================
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod image;
pub mod metrics;
pub mod storage;
pub mod thumbnail;
pub mod time;
pub mod web;
