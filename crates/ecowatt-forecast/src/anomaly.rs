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

//! Consumption anomaly detection via a robust z-score.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use ecowatt_types::TelemetryRecord;

use crate::error::{ForecastError, Result};

/// Modified z-score threshold; 3.5 is the usual Iglewicz-Hoaglin cutoff.
const Z_THRESHOLD: f64 = 3.5;

/// MAD to standard-deviation consistency factor for normal data.
const MAD_SCALE: f64 = 1.4826;

/// One flagged consumption sample.
#[derive(Debug, Clone, Serialize)]
pub struct AnomalyPoint {
    pub timestamp: DateTime<Utc>,
    pub consumption_kwh: f64,
    /// Modified z-score of the sample (signed)
    pub score: f64,
}

/// Median/MAD model of normal consumption.
///
/// Median and MAD are insensitive to the very spikes being hunted, so the
/// model does not need the training window to be clean.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    median: f64,
    robust_scale: f64,
}

impl AnomalyDetector {
    /// Fit on the telemetry history.
    pub fn fit(records: &[TelemetryRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                got: 0,
            });
        }
        let center = median(records.iter().map(|r| r.consumption_kwh).collect());
        let mad = median(
            records
                .iter()
                .map(|r| (r.consumption_kwh - center).abs())
                .collect(),
        );
        // Floor keeps a flat series from dividing by zero; everything equal
        // to the median still scores 0.
        let robust_scale = (mad * MAD_SCALE).max(1e-9);

        info!(
            "Anomaly model fit on {} samples: median {:.2} kWh, robust scale {:.2}",
            records.len(),
            center,
            robust_scale
        );
        Ok(Self {
            median: center,
            robust_scale,
        })
    }

    /// Modified z-score of one consumption value.
    pub fn score(&self, consumption_kwh: f64) -> f64 {
        (consumption_kwh - self.median) / self.robust_scale
    }

    pub fn is_anomaly(&self, consumption_kwh: f64) -> bool {
        self.score(consumption_kwh).abs() > Z_THRESHOLD
    }

    /// Flag every anomalous sample in the given window, in input order.
    pub fn detect(&self, records: &[TelemetryRecord]) -> Vec<AnomalyPoint> {
        records
            .iter()
            .filter(|r| self.is_anomaly(r.consumption_kwh))
            .map(|r| AnomalyPoint {
                timestamp: r.timestamp,
                consumption_kwh: r.consumption_kwh,
                score: self.score(r.consumption_kwh),
            })
            .collect()
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
