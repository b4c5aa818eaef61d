//! # Environment Variable Utilities
//!
//! Typed readers over a provider closure with fallback defaults. Config
//! sections pass `|k| std::env::var(k).ok()` in production and canned maps
//! in tests.
//!
//! # Examples
//! ```rust
//! use thumbcache::config::env::read_u32_from;
//!
//! let workers = read_u32_from(|_| Some("8".into()), "WORKER_POOL_SIZE", 4);
//! assert_eq!(workers, 8);
//! ```

/// Reads a `u32`, returning `default` when unset or unparsable.
pub fn read_u32_from<F>(provider: F, name: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| unquote(&s).parse::<u32>().ok())
        .unwrap_or(default)
}

/// Reads a `u64`, returning `default` when unset or unparsable.
pub fn read_u64_from<F>(provider: F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| unquote(&s).parse::<u64>().ok())
        .unwrap_or(default)
}

/// Reads a non-empty string, returning `default` when unset or blank.
pub fn read_string_from<F>(provider: F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .map(|s| unquote(&s).to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn unquote(v: &str) -> &str {
    v.trim().trim_matches(|c| c == '"' || c == '\'')
}
