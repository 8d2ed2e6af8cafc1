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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hourly telemetry sample as stored in the CSV telemetry file.
///
/// Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: DateTime<Utc>,
    /// Ambient temperature (°C)
    pub temperature_c: f64,
    /// Solar generation for the hour (kWh)
    pub solar_energy_kwh: f64,
    /// Load drawn from the grid (kW)
    pub grid_load_kw: f64,
    /// Household consumption for the hour (kWh)
    pub consumption_kwh: f64,
}

impl TelemetryRecord {
    /// Hour-of-day of the sample in [0, 23].
    pub fn hour(&self) -> u32 {
        use chrono::Timelike;
        self.timestamp.hour()
    }
}
