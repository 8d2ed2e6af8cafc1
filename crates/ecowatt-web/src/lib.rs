// Copyright (c) 2025 ECOWATT LABS S.R.O.
//
// This file is part of EcoWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@ecowatt-labs.cz

//! HTTP surface of the EcoWatt backend.
//!
//! Thin JSON layer over the optimizer, forecaster and telemetry store. The
//! optimizer is trained before the router is built; handlers only ever take
//! read guards, so the single-writer discipline of the core holds.

mod error;
mod routes;

pub use error::WebError;
pub use routes::{
    DashboardAnomaly, DashboardData, OptimizeResponse, PredictRequest, PredictResponse,
    ServiceBanner,
};

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use parking_lot::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;

use ecowatt_core::QLearningOptimizer;
use ecowatt_forecast::{AnomalyDetector, DemandForecaster};
use ecowatt_simulator::TelemetryStore;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub optimizer: Arc<RwLock<QLearningOptimizer>>,
    pub forecaster: Arc<DemandForecaster>,
    pub detector: Arc<AnomalyDetector>,
    pub store: TelemetryStore,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root_handler))
        .route("/health", get(routes::health_handler))
        .route("/dashboard_data", get(routes::dashboard_data_handler))
        .route("/predict_demand", post(routes::predict_demand_handler))
        .route("/optimize", post(routes::optimize_handler))
        .route("/rl_metrics", get(routes::rl_metrics_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
///
/// # Errors
/// Returns error if the listener fails to bind or serving fails.
pub async fn start_server(
    state: AppState,
    bind_address: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);
    let addr = format!("{bind_address}:{port}");
    info!("🌐 Starting EcoWatt API on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
