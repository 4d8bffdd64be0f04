mod claims;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::claims::intake::seed_demo_claim;
use crate::claims::memory::InMemoryClaimStore;
use crate::claims::postgres::PgClaimStore;
use crate::claims::store::ClaimStore;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting claims API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    if config.seed_demo_claim {
        seed_demo_claim(store.as_ref(), &config.default_claim_id).await?;
    }

    // Build app state
    let state = AppState {
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the portal front-end host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store reset on restart.
async fn build_store(config: &Config) -> Result<Arc<dyn ClaimStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            info!("Claim store: PostgreSQL");
            Ok(Arc::new(PgClaimStore::new(pool)))
        }
        None => {
            info!("Claim store: in-memory (contents are lost on restart)");
            Ok(Arc::new(InMemoryClaimStore::new()))
        }
    }
}
