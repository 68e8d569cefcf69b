mod auth;
mod config;
mod db;
mod errors;
mod models;
mod recommendations;
mod routes;
mod seed;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::seed::seed_if_empty;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CollegeConnect API v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config).await?;

    // Built once up front so the first unknown-email login costs the same as the rest.
    auth::password::dummy_hash()?;

    // Seed before binding so no request observes a half-seeded dataset.
    if config.seed_colleges {
        seed_if_empty(state.colleges.as_ref()).await?;
    } else {
        info!("College seeding disabled");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
