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

//! JSON request handlers.

use axum::Json;
use axum::extract::State;
use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ecowatt_core::PolicyMetrics;
use ecowatt_forecast::{DemandFeatures, lags_from_history};
use ecowatt_types::TelemetryRecord;

use crate::AppState;
use crate::error::WebError;

/// Grid carbon intensity used for the CO₂-saved figure (kg CO₂ per kWh).
const CO2_KG_PER_GRID_KWH: f64 = 0.8;

/// Trailing window used for the dashboard aggregates.
const DASHBOARD_WINDOW_HOURS: usize = 24;

// ============= Payloads =============

/// Prediction/optimization request body.
///
/// `hour` defaults to the current UTC hour and the lag features default to
/// the tail of the stored telemetry history.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub temperature: f64,
    pub solar_energy: f64,
    pub grid_load: f64,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub lag1: Option<f64>,
    #[serde(default)]
    pub lag24: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceBanner {
    pub message: &'static str,
    pub optimizer_status: &'static str,
    pub episodes_trained: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub predicted_consumption: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub predicted_consumption: f64,
    pub renewable_used_kwh: f64,
    pub grid_used_kwh: f64,
    pub renewable_ratio_percent: f64,
    pub co2_saved_kg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub avg_consumption: f64,
    pub avg_solar: f64,
    pub renewable_ratio_percent: f64,
    pub anomalies: Vec<DashboardAnomaly>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardAnomaly {
    pub timestamp: chrono::DateTime<Utc>,
    pub consumption: f64,
}

// ============= Handlers =============

pub async fn root_handler(State(state): State<AppState>) -> Json<ServiceBanner> {
    let episodes_trained = state.optimizer.read().episodes_trained();
    Json(ServiceBanner {
        message: "EcoWatt backend active",
        optimizer_status: "running",
        episodes_trained,
    })
}

pub async fn health_handler() -> &'static str {
    "OK"
}

/// Trailing-24h aggregates plus the most recent anomalies, for the
/// dashboard front-end.
pub async fn dashboard_data_handler(
    State(state): State<AppState>,
) -> Result<Json<DashboardData>, WebError> {
    let records = state.store.load()?;
    let window_start = records.len().saturating_sub(DASHBOARD_WINDOW_HOURS);
    let window = &records[window_start..];

    let avg_consumption = round2(mean(window.iter().map(|r| r.consumption_kwh)));
    let avg_solar = round2(mean(window.iter().map(|r| r.solar_energy_kwh)));
    // The +1 in the denominator mirrors the reference dashboard and keeps an
    // empty window from dividing by zero.
    let renewable_ratio_percent = round2(avg_solar / (avg_consumption + 1.0) * 100.0);

    let mut anomalies: Vec<DashboardAnomaly> = state
        .detector
        .detect(&records)
        .into_iter()
        .map(|point| DashboardAnomaly {
            timestamp: point.timestamp,
            consumption: round2(point.consumption_kwh),
        })
        .collect();
    if anomalies.len() > 10 {
        anomalies.drain(..anomalies.len() - 10);
    }

    Ok(Json(DashboardData {
        avg_consumption,
        avg_solar,
        renewable_ratio_percent,
        anomalies,
    }))
}

pub async fn predict_demand_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, WebError> {
    let predicted = predict_consumption(&state, &request)?;
    Ok(Json(PredictResponse {
        predicted_consumption: round2(predicted),
    }))
}

/// Forecast demand, then render the learned allocation split and the
/// derived CO₂ figure for it.
pub async fn optimize_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<OptimizeResponse>, WebError> {
    let predicted = predict_consumption(&state, &request)?;

    let decision = state
        .optimizer
        .read()
        .render_allocation(request.solar_energy, predicted);

    // Baseline assumes everything comes from the grid; savings are whatever
    // the renderer moved off it.
    let co2_saved_kg = CO2_KG_PER_GRID_KWH * (predicted - decision.grid_used_kwh);

    debug!(
        "optimize: demand {:.2} kWh -> renewable {:.2} / grid {:.2}",
        predicted, decision.renewable_used_kwh, decision.grid_used_kwh
    );

    Ok(Json(OptimizeResponse {
        predicted_consumption: round2(predicted),
        renewable_used_kwh: round2(decision.renewable_used_kwh),
        grid_used_kwh: round2(decision.grid_used_kwh),
        renewable_ratio_percent: round2(decision.renewable_ratio_percent),
        co2_saved_kg: round2(co2_saved_kg),
    }))
}

pub async fn rl_metrics_handler(State(state): State<AppState>) -> Json<PolicyMetrics> {
    Json(state.optimizer.read().metrics())
}

// ============= Helpers =============

fn predict_consumption(state: &AppState, request: &PredictRequest) -> Result<f64, WebError> {
    let hour = request.hour.unwrap_or_else(|| Utc::now().hour());

    let (lag1, lag24) = match (request.lag1, request.lag24) {
        (Some(lag1), Some(lag24)) => (lag1, lag24),
        _ => {
            let records: Vec<TelemetryRecord> = state.store.load()?;
            let (history_lag1, history_lag24) = lags_from_history(&records);
            (
                request.lag1.unwrap_or(history_lag1),
                request.lag24.unwrap_or(history_lag24),
            )
        }
    };

    Ok(state.forecaster.predict(DemandFeatures {
        hour,
        temperature_c: request.temperature,
        solar_energy_kwh: request.solar_energy,
        grid_load_kw: request.grid_load,
        lag1_kwh: lag1,
        lag24_kwh: lag24,
    }))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Rounding for presentation only; internal invariants hold on the
/// unrounded values.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
