use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod error;
mod rest;

use config::Config;
use db::DbConnection;
use domain::ResponseService;
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    info!("Opening response database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    let state = AppState::new(ResponseService::new(db));
    let app = rest::app(state, &config.allowed_origin, &config.frontend_dist)?;

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Record store listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
