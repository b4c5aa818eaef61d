use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thumbcache::config::app::AppConfig;
use thumbcache::config::db::create_pool;
use thumbcache::db::mysql_adapter::MySqlDb;
use thumbcache::fetch::reqwest_fetcher::ReqwestFetcher;
use thumbcache::image::image_rs_processor::ImageRsProcessor;
use thumbcache::metrics::prometheus::PrometheusMetrics;
use thumbcache::storage::local_storage::LocalFileStorage;
use thumbcache::thumbnail::coordinator::ThumbnailCoordinator;
use thumbcache::thumbnail::db_store::DbThumbnailStore;
use thumbcache::thumbnail::memory_store::MemoryThumbnailStore;
use thumbcache::thumbnail::service::ThumbnailService;
use thumbcache::thumbnail::store::ThumbnailStore;
use thumbcache::time::clock::Clock;
use thumbcache::time::system_clock::SystemClock;
use thumbcache::web::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env();
    info!(app_env = %cfg.app_env, "starting thumbcache");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let store = build_store(&cfg, clock)?;

    let metrics = Arc::new(PrometheusMetrics::new().context("register metrics")?);
    let coordinator = ThumbnailCoordinator::new(
        store,
        Arc::new(ReqwestFetcher::new(&cfg.fetch)?),
        Arc::new(ImageRsProcessor::with_quality(cfg.image.jpeg_quality)),
        metrics.clone(),
        cfg.coordinator.workers,
        cfg.coordinator.retry.clone(),
    );
    let service = Arc::new(ThumbnailService::new(
        coordinator,
        metrics.clone(),
        cfg.image.clone(),
        cfg.coordinator.wait_timeout,
    ));

    let app = build_router(service, metrics);
    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("bind {}", cfg.bind_addr))?;
    info!(addr = %cfg.bind_addr, "listening");

    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}

/// MySQL rows with blob files when `DATABASE_URL` is set, memory otherwise.
fn build_store(cfg: &AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Arc<dyn ThumbnailStore>> {
    if !cfg.db.is_valid() {
        warn!("DATABASE_URL is not set; thumbnails are kept in memory only");
        return Ok(Arc::new(MemoryThumbnailStore::new(clock)));
    }

    let pool = create_pool(&cfg.db).context("create database pool")?;
    let store = DbThumbnailStore::new(
        Arc::new(MySqlDb::new(pool)),
        Arc::new(LocalFileStorage::new(cfg.media.root.clone())),
        clock,
    );
    store.ensure_schema()?;
    info!(media_root = %cfg.media.root.display(), "using MySQL thumbnail store");
    Ok(Arc::new(store))
}
