//! Weld Pass Calculator - Rust/Axum service
//!
//! JSON API for groove weld pass counts. The browser form and static assets
//! are served elsewhere.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weld_pass_calculator::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = weld_pass_calculator::app();

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
