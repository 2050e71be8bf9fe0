use std::sync::Arc;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use cmms_analytics as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let mut options = ConnectOptions::new(cfg.database_url().to_owned());
    options
        .max_connections(cfg.db_max_connections)
        .sqlx_logging(false);
    let db = Arc::new(
        Database::connect(options)
            .await
            .context("failed to connect to database")?,
    );

    let source = Arc::new(api::repositories::SeaOrmRecordSource::new(db.clone()));
    let analytics = api::services::analytics::AnalyticsService::new(source, cfg.analytics.clone());
    let app_state = api::AppState::new(analytics).with_db(db);

    let mut app = api::build_router(app_state);
    if cfg.is_production() {
        info!("Production environment; CORS left at defaults");
    } else {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, environment = %cfg.environment, "cmms-analytics listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
