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

//! Linear demand forecaster over calendar and lag features.

use serde::{Deserialize, Serialize};
use tracing::info;

use ecowatt_types::TelemetryRecord;

use crate::error::{ForecastError, Result};

/// Minimum telemetry samples required to fit (two full days, so the 24-hour
/// lag feature has real values to learn from).
pub const MIN_FIT_SAMPLES: usize = 48;

/// Ridge damping added to the normal equations diagonal.
const RIDGE_LAMBDA: f64 = 1e-3;

/// Feature count including the bias column.
const FEATURES: usize = 8;

/// Input features for one demand prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DemandFeatures {
    /// Hour of day, wrapped into [0, 23]
    pub hour: u32,
    pub temperature_c: f64,
    pub solar_energy_kwh: f64,
    pub grid_load_kw: f64,
    /// Consumption one hour earlier (kWh)
    pub lag1_kwh: f64,
    /// Consumption 24 hours earlier (kWh)
    pub lag24_kwh: f64,
}

/// Ordinary least squares with ridge damping, fit by normal equations.
///
/// The hour enters as a sine/cosine pair so midnight and 23:00 sit next to
/// each other instead of at opposite ends of a linear scale.
#[derive(Debug, Clone)]
pub struct DemandForecaster {
    weights: [f64; FEATURES],
    /// Mean squared error on the chronological 20% holdout, for display
    validation_mse: f64,
}

impl DemandForecaster {
    /// Fit on the telemetry history, oldest record first.
    ///
    /// The model is fit on the first 80% of the history and scored on the
    /// remaining 20% (chronological split, no shuffling).
    pub fn fit(records: &[TelemetryRecord]) -> Result<Self> {
        if records.len() < MIN_FIT_SAMPLES {
            return Err(ForecastError::InsufficientHistory {
                required: MIN_FIT_SAMPLES,
                got: records.len(),
            });
        }

        let samples = build_samples(records);
        let split = samples.len() * 4 / 5;
        let (train, holdout) = samples.split_at(split.max(1));

        let weights = solve_normal_equations(train)?;

        let mut forecaster = Self {
            weights,
            validation_mse: 0.0,
        };
        if !holdout.is_empty() {
            let sse: f64 = holdout
                .iter()
                .map(|(features, target)| {
                    let err = forecaster.predict(*features) - target;
                    err * err
                })
                .sum();
            forecaster.validation_mse = sse / holdout.len() as f64;
        }

        info!(
            "Demand model fit on {} samples, holdout MSE {:.3}",
            train.len(),
            forecaster.validation_mse
        );
        Ok(forecaster)
    }

    /// Predicted consumption (kWh) for the given features.
    pub fn predict(&self, features: DemandFeatures) -> f64 {
        let row = feature_row(features);
        row.iter().zip(self.weights.iter()).map(|(x, w)| x * w).sum()
    }

    pub fn validation_mse(&self) -> f64 {
        self.validation_mse
    }
}

/// Resolve the lag features from the tail of the history: the latest
/// consumption value and the one 24 hours back (back-filled with the latest
/// value when the history is shorter than a day).
pub fn lags_from_history(records: &[TelemetryRecord]) -> (f64, f64) {
    let lag1 = records.last().map_or(0.0, |r| r.consumption_kwh);
    let lag24 = if records.len() >= 24 {
        records[records.len() - 24].consumption_kwh
    } else {
        lag1
    };
    (lag1, lag24)
}

fn build_samples(records: &[TelemetryRecord]) -> Vec<(DemandFeatures, f64)> {
    (0..records.len())
        .map(|i| {
            let record = &records[i];
            // Back-fill semantics for the leading rows that have no real lag.
            let lag1 = records[i.saturating_sub(1)].consumption_kwh;
            let lag24 = if i >= 24 {
                records[i - 24].consumption_kwh
            } else {
                records[0].consumption_kwh
            };
            let features = DemandFeatures {
                hour: record.hour(),
                temperature_c: record.temperature_c,
                solar_energy_kwh: record.solar_energy_kwh,
                grid_load_kw: record.grid_load_kw,
                lag1_kwh: lag1,
                lag24_kwh: lag24,
            };
            (features, record.consumption_kwh)
        })
        .collect()
}

fn feature_row(features: DemandFeatures) -> [f64; FEATURES] {
    let angle = f64::from(features.hour % 24) / 24.0 * std::f64::consts::TAU;
    [
        1.0,
        angle.sin(),
        angle.cos(),
        features.temperature_c,
        features.solar_energy_kwh,
        features.grid_load_kw,
        features.lag1_kwh,
        features.lag24_kwh,
    ]
}

/// Solve (XᵀX + λI) w = Xᵀy by Gaussian elimination with partial pivoting.
fn solve_normal_equations(samples: &[(DemandFeatures, f64)]) -> Result<[f64; FEATURES]> {
    let mut xtx = [[0.0f64; FEATURES]; FEATURES];
    let mut xty = [0.0f64; FEATURES];

    for (features, target) in samples {
        let row = feature_row(*features);
        for i in 0..FEATURES {
            for j in 0..FEATURES {
                xtx[i][j] += row[i] * row[j];
            }
            xty[i] += row[i] * target;
        }
    }
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += RIDGE_LAMBDA;
    }

    // Forward elimination with partial pivoting
    for col in 0..FEATURES {
        let pivot_row = (col..FEATURES)
            .max_by(|&a, &b| {
                xtx[a][col]
                    .abs()
                    .partial_cmp(&xtx[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if xtx[pivot_row][col].abs() < 1e-12 {
            return Err(ForecastError::DegenerateFeatures);
        }
        xtx.swap(col, pivot_row);
        xty.swap(col, pivot_row);

        for row in (col + 1)..FEATURES {
            let factor = xtx[row][col] / xtx[col][col];
            for k in col..FEATURES {
                xtx[row][k] -= factor * xtx[col][k];
            }
            xty[row] -= factor * xty[col];
        }
    }

    // Back substitution
    let mut weights = [0.0f64; FEATURES];
    for row in (0..FEATURES).rev() {
        let mut sum = xty[row];
        for col in (row + 1)..FEATURES {
            sum -= xtx[row][col] * weights[col];
        }
        weights[row] = sum / xtx[row][row];
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn synthetic_history(hours: usize) -> Vec<TelemetryRecord> {
        // Deterministic profile where consumption is an exact linear
        // function of the features the model uses.
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        (0..hours)
            .map(|i| {
                let timestamp = start + Duration::hours(i as i64);
                let hour = f64::from((i % 24) as u32);
                let temperature_c = 15.0 + (i as f64 * 0.01).sin() * 5.0;
                let solar_energy_kwh = (hour - 12.0).abs().mul_add(-5.0, 60.0).max(0.0);
                let grid_load_kw = 100.0 + hour;
                let consumption_kwh = 50.0 + 2.0 * temperature_c + 0.3 * grid_load_kw;
                TelemetryRecord {
                    timestamp,
                    temperature_c,
                    solar_energy_kwh,
                    grid_load_kw,
                    consumption_kwh,
                }
            })
            .collect()
    }

    #[test]
    fn test_fit_requires_two_days_of_history() {
        let records = synthetic_history(20);
        assert_eq!(
            DemandForecaster::fit(&records).unwrap_err(),
            ForecastError::InsufficientHistory {
                required: MIN_FIT_SAMPLES,
                got: 20
            }
        );
    }

    #[test]
    fn test_recovers_linear_consumption_profile() {
        let records = synthetic_history(24 * 10);
        let forecaster = DemandForecaster::fit(&records).expect("fit should succeed");

        // Score a sample from the holdout window, lags resolved the same way
        // training rows resolve them.
        let i = 24 * 9 + 7;
        let target = records[i].consumption_kwh;
        let prediction = forecaster.predict(DemandFeatures {
            hour: records[i].hour(),
            temperature_c: records[i].temperature_c,
            solar_energy_kwh: records[i].solar_energy_kwh,
            grid_load_kw: records[i].grid_load_kw,
            lag1_kwh: records[i - 1].consumption_kwh,
            lag24_kwh: records[i - 24].consumption_kwh,
        });
        assert!(
            (prediction - target).abs() < 2.0,
            "prediction {prediction} should track the generating function ({target})"
        );
        assert!(forecaster.validation_mse() < 1.0, "holdout error should be tiny on noiseless data");
    }

    #[test]
    fn test_lag_backfill_on_short_history() {
        let records = synthetic_history(10 + MIN_FIT_SAMPLES)[..10].to_vec();
        let (lag1, lag24) = lags_from_history(&records);
        assert_eq!(lag1, records[9].consumption_kwh);
        assert_eq!(lag24, lag1, "short history back-fills the daily lag");
    }
}
