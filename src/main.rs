mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;
use tokio::net::TcpListener;
use crate::config::ServerConfig;
use crate::external::yahoo::YahooProvider;
use crate::logging::{init_logging, LoggingConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = ServerConfig::from_env()?;

    let provider = YahooProvider::new(config.upstream_url.clone(), &config.upstream_user_agent)?;
    tracing::info!("📊 Using price provider: Yahoo Finance at {}", config.upstream_url);
    tracing::info!("⏱️ Intraday lookback window: {} days", config.intraday_lookback_days);

    let state = AppState::from_config(&config, Arc::new(provider));
    let app = app::create_app(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Market data proxy running at http://{}/", addr);
    axum::serve(listener, app)
        .await?;

    Ok(())
}
