pub mod config;
pub mod error;
pub mod http;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repository;
pub mod service;

pub use config::{CliArgs, ServerConfig};
pub use error::VehicleError;
pub use logging::{LogFormat, LoggingConfig, init_logging};

use crate::http::AppState;
use crate::loader::{JsonFileLoader, VehicleLoader};
use crate::repository::VehicleMap;
use crate::service::VehicleService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Wire loader → repository → service → handlers and serve until shutdown.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let loader = Arc::new(JsonFileLoader::new(config.db_path.clone()));
    let seed = loader
        .load()
        .with_context(|| format!("loading vehicles from {:?}", config.db_path))?;
    tracing::info!(
        vehicles = seed.len(),
        db = %config.db_path.display(),
        "seed file loaded"
    );

    let repository = Arc::new(VehicleMap::new(loader, seed));
    let service = VehicleService::new(repository);
    let state = Arc::new(AppState::new(service));
    let router = http::router(state);

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("binding {}", config.bind_address))?;
    let actual_addr = listener.local_addr()?;
    tracing::info!(bind = %actual_addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("ctrl-c handler installs");
    tracing::info!("shutdown signal received");
}
