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

//! Demand forecasting and anomaly detection over the telemetry history.
//!
//! Both estimators are deliberately plain: a ridge-damped linear model over
//! calendar and lag features for demand, and a robust z-score over
//! consumption for anomalies. They feed the optimizer and the dashboard;
//! neither is on the learning path of the allocation policy.

pub mod anomaly;
pub mod demand;

mod error;

pub use anomaly::{AnomalyDetector, AnomalyPoint};
pub use demand::{DemandFeatures, DemandForecaster, lags_from_history};
pub use error::{ForecastError, Result};
