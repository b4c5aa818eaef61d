//! # Application Configuration Loader
//!
//! Provides a unified configuration loader for the thumbnail service.
//!
//! Automatically loads `.env` files for non-production environments.
//! It checks for a custom `DOTENV_FILE` path first, then falls back to
//! `.env.{APP_ENV}` or `.env`.
//!
//! # Environment Variables
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `APP_ENV` | Current environment (`development`, `production`, etc.) | `"development"` |
//! | `DOTENV_FILE` | Optional path to a custom dotenv file | *none* |
//! | `BIND_ADDR` | Listen address of the HTTP server | `0.0.0.0:8000` |
//! | `DATABASE_URL` | MySQL connection URL; in-memory store when unset | *none* |
//! | `MEDIA_ROOT` | Blob directory for encoded thumbnails | `media` |
//! | `THUMBNAIL_MAX_WIDTH` / `THUMBNAIL_MAX_HEIGHT` | Largest accepted bounding box | `4096` |
//! | `JPEG_QUALITY` | Output JPEG quality | `75` |
//! | `FETCH_TIMEOUT_SECS` | Origin request timeout | `10` |
//! | `FETCH_MAX_BYTES` | Largest accepted origin body | `20971520` |
//! | `WORKER_POOL_SIZE` | Concurrent thumbnail jobs | `4` |
//! | `WAIT_TIMEOUT_SECS` | Per-request wait bound | `30` |
//! | `RETRY_MAX_ATTEMPTS` | Attempts per job | `3` |
//! | `RETRY_BACKOFF_MS` / `RETRY_BACKOFF_MAX_MS` | Exponential backoff bounds | `1000` / `8000` |
//!
//! # Example
//! ```rust,no_run
//! use thumbcache::config::app::AppConfig;
//!
//! let cfg = AppConfig::from_env();
//! println!("listening on {}", cfg.bind_addr);
//! ```

use std::env;

use crate::config::{
    coordinator::CoordinatorConfig, db::DbConfig, env::read_string_from, fetch::FetchConfig,
    image::ImageConfig, media::MediaConfig,
};

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Current environment name.
    pub app_env: String,
    pub bind_addr: String,
    pub db: DbConfig,
    pub media: MediaConfig,
    pub image: ImageConfig,
    pub fetch: FetchConfig,
    pub coordinator: CoordinatorConfig,
}

impl AppConfig {
    /// Loads application configuration from environment variables.
    ///
    /// ## Behavior
    /// - Reads `APP_ENV` (defaults to `"development"`).
    /// - Loads `.env` or `.env.{APP_ENV}` for non-production environments.
    /// - Parses all supported environment variables and falls back to defaults.
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        if app_env != "production" {
            if let Ok(path) = env::var("DOTENV_FILE") {
                let _ = dotenvy::from_filename(path);
            } else {
                let candidate = format!(".env.{}", app_env);
                dotenvy::from_filename(&candidate)
                    .or_else(|_| dotenvy::dotenv())
                    .ok();
            }
        }

        Self::from_provider(app_env, |k| env::var(k).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_provider<F>(app_env: String, provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        AppConfig {
            app_env,
            bind_addr: read_string_from(&provider, "BIND_ADDR", "0.0.0.0:8000"),
            db: DbConfig::from_provider(&provider),
            media: MediaConfig::from_provider(&provider),
            image: ImageConfig::from_provider(&provider),
            fetch: FetchConfig::from_provider(&provider),
            coordinator: CoordinatorConfig::from_provider(&provider),
        }
    }
}
