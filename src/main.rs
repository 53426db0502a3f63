use actix_web::web;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod domain;
mod http;
mod metrics;
mod store;

use domain::ordering::OrderingEngine;
use store::PgOrderStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,resource_sorting=debug"))
        )
        .init();

    tracing::info!("🚀 Starting resource sorting service");

    // === 1. Load configuration and register sortable resources ===
    let config = config::AppConfig::load()?;
    let registry = config.build_registry()?;
    tracing::info!(
        resources = ?registry.names().collect::<Vec<_>>(),
        "Registered sortable resources"
    );

    // === 2. Connect to PostgreSQL ===
    tracing::info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(config.database_url()?)
        .await?;

    // === 3. Initialize Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 4. Wire the engine and serve ===
    let engine = OrderingEngine::new(Arc::new(PgOrderStore::new(pool)), metrics.clone());
    let state = web::Data::new(http::AppState {
        engine,
        registry,
        metrics,
    });

    http::start_server(state, &config.server.host, config.server.port).await?;

    tracing::info!("Server stopped");
    Ok(())
}
