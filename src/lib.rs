//! Weld Pass Calculator
//!
//! Computes how many tandem submerged-arc passes fill a double-V groove from
//! joint geometry and electrode currents, and serves the calculation as a
//! JSON API.

use axum::{response::Json, routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod passcalc;

/// Build the application router.
pub fn app() -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Pass calculator API, open to browser clients on any origin
        .nest("/api", passcalc::router().layer(CorsLayer::permissive()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "weld-pass-calculator",
        "version": env!("CARGO_PKG_VERSION"),
        "formulas": passcalc::groove::AREA_FORMULAS.len()
    }))
}
