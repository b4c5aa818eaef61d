pub mod fallback;
pub mod metrics_handler;
pub mod router;
pub mod thumbnail_handler;
