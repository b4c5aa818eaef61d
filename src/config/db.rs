//! # Database Configuration and Pool Factory
//!
//! Provides database connection configuration (`DbConfig`) and a helper
//! to create a MySQL connection pool (`DbPool`) for the thumbnail table.
//!
//! `DATABASE_URL` is optional: without it the service keeps thumbnails in
//! process memory, which is what local development and tests use.
//!
//! # Examples
//! ```rust,no_run
//! use thumbcache::config::db::{DbConfig, create_pool};
//!
//! let cfg = DbConfig::from_env();
//! if cfg.is_valid() {
//!     let pool = create_pool(&cfg).expect("failed to create pool");
//!     // use pool...
//! }
//! ```

use std::sync::Arc;

use mysql::{Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts};

use super::env::{read_string_from, read_u32_from};

/// Database connection configuration.
///
/// Reads from environment variables:
/// - `DATABASE_URL`: MySQL connection URL
/// - `DATABASE_MAX_CONN`: optional maximum pool size
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

impl DbConfig {
    /// Builds a [`DbConfig`] from environment variables.
    pub fn from_env() -> Self {
        Self::from_provider(|k| std::env::var(k).ok())
    }

    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = Some(read_string_from(&provider, "DATABASE_URL", "")).filter(|s| !s.is_empty());
        let max_connections = match read_u32_from(&provider, "DATABASE_MAX_CONN", 0) {
            0 => None,
            n => Some(n),
        };
        Self {
            url,
            max_connections,
        }
    }

    /// Returns `true` if `DATABASE_URL` is present.
    pub fn is_valid(&self) -> bool {
        self.url.is_some()
    }
}

/// Shared database pool type alias (`Arc<mysql::Pool>`).
pub type DbPool = Arc<Pool>;

/// Creates a new [`DbPool`] using the given configuration.
///
/// # Errors
/// Returns an error if `DATABASE_URL` is missing, the URL is invalid, or the
/// pool cannot be created.
pub fn create_pool(cfg: &DbConfig) -> anyhow::Result<DbPool> {
    let url = cfg
        .url
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
    let mut builder = OptsBuilder::from_opts(Opts::from_url(url)?);
    if let Some(max) = cfg.max_connections {
        let max = max.max(1) as usize;
        let constraints = PoolConstraints::new(1, max)
            .ok_or_else(|| anyhow::anyhow!("invalid DATABASE_MAX_CONN: {max}"))?;
        builder = builder.pool_opts(PoolOpts::default().with_constraints(constraints));
    }
    let pool = Pool::new(Opts::from(builder))?;
    Ok(Arc::new(pool))
}
