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

//! Synthetic household telemetry profiles.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rand::Rng;

use ecowatt_types::TelemetryRecord;

/// Sample one telemetry record for the given instant.
///
/// The shape follows the reference profile: consumption oscillates around
/// 120 kWh with a daily sine, solar output is a bell over 06:00-18:00
/// peaking near 100 kWh, temperature follows a yearly sine around 20 °C and
/// grid load is the consumption base minus 30% of solar self-supply.
pub fn sample_at<R: Rng + ?Sized>(timestamp: DateTime<Utc>, rng: &mut R) -> TelemetryRecord {
    let hour = f64::from(timestamp.hour());
    let day_of_year = f64::from(timestamp.ordinal());

    let base = 120.0 + 40.0 * (hour / 24.0 * std::f64::consts::TAU).sin() + gaussian(rng, 5.0);
    let temperature_c =
        20.0 + 10.0 * (day_of_year / 365.0 * std::f64::consts::TAU).sin() + gaussian(rng, 2.0);
    let solar_energy_kwh =
        (100.0 * ((hour - 6.0) / 12.0 * std::f64::consts::PI).sin() + gaussian(rng, 8.0)).max(0.0);
    let grid_load_kw = base - solar_energy_kwh * 0.3 + gaussian(rng, 3.0);
    let consumption_kwh = base + gaussian(rng, 6.0);

    TelemetryRecord {
        timestamp,
        temperature_c,
        solar_energy_kwh,
        grid_load_kw,
        consumption_kwh,
    }
}

/// Generate hourly records covering the trailing `days` up to `now`,
/// oldest first, endpoints inclusive.
pub fn generate_history<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    days: u32,
    rng: &mut R,
) -> Vec<TelemetryRecord> {
    let start = now - Duration::days(i64::from(days));
    let mut records = Vec::new();
    let mut ts = start;
    while ts <= now {
        records.push(sample_at(ts, rng));
        ts += Duration::hours(1);
    }
    records
}

/// Standard normal draw scaled by `std_dev`, via Box-Muller on the uniform
/// source (keeps the crate on plain `Rng` without a distributions
/// dependency).
fn gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos() * std_dev
}
