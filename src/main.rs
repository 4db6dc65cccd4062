use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use time::Duration;
use tokio::net::TcpListener;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use hsk_srs::{
    config::AppConfig,
    data::repositories::{DieselReviewStore, DieselWordCatalog, VocabularyActivityTracker},
    db,
    features::srs::{SrsService, SystemClock},
    handlers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("Failed to read configuration")?;

    // Database configuration
    let pool = db::create_pool(
        &config.database_url,
        config.db_pool_size,
        config.db_busy_timeout_ms,
    )
    .context("Failed to create DB pool")?;
    db::run_migrations(&pool).context("Failed to apply database schema")?;

    // Scheduling core
    let catalog = Arc::new(DieselWordCatalog::new(pool.clone()));
    let srs = SrsService::new(
        Arc::new(DieselReviewStore::new(pool.clone())),
        catalog.clone(),
        Arc::new(SystemClock),
    )
    .with_observer(Arc::new(VocabularyActivityTracker::new(pool.clone(), catalog)));

    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_expiry_days)))
        .with_secure(false);

    let app = Router::new()
        .nest("/api/vocabulary", handlers::review_router(Arc::new(srs)))
        .layer(session_layer);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
