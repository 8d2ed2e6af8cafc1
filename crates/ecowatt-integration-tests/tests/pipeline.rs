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

//! Whole-pipeline tests: simulated telemetry through store, models and the
//! learned allocation policy.

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use ecowatt_core::QLearningOptimizer;
use ecowatt_forecast::{AnomalyDetector, DemandFeatures, DemandForecaster, lags_from_history};
use ecowatt_simulator::{TelemetryStore, generate_history};
use ecowatt_types::OptimizerConfig;

#[test]
fn test_telemetry_survives_the_store_round_trip() {
    let mut rng = StdRng::seed_from_u64(20);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
    let records = generate_history(now, 3, &mut rng);

    let dir = tempfile::tempdir().expect("tempdir");
    let store = TelemetryStore::new(dir.path().join("energy_data.csv"));
    store.write_all(&records).expect("write");

    let loaded = store.load().expect("load");
    assert_eq!(loaded, records, "store round trip must be lossless");
}

#[test]
fn test_forecaster_fits_on_simulated_history() {
    let mut rng = StdRng::seed_from_u64(21);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
    let records = generate_history(now, 14, &mut rng);

    let forecaster = DemandForecaster::fit(&records).expect("fit");

    // The synthetic profile keeps consumption roughly in [80, 180]; a model
    // fit on it should predict inside a generous version of that band.
    let (lag1, lag24) = lags_from_history(&records);
    let last = records.last().unwrap();
    let predicted = forecaster.predict(DemandFeatures {
        hour: last.hour(),
        temperature_c: last.temperature_c,
        solar_energy_kwh: last.solar_energy_kwh,
        grid_load_kw: last.grid_load_kw,
        lag1_kwh: lag1,
        lag24_kwh: lag24,
    });
    assert!(
        (40.0..260.0).contains(&predicted),
        "prediction {predicted} outside the simulated consumption band"
    );
    assert!(
        forecaster.validation_mse() < 500.0,
        "holdout MSE {} should stay in the order of the noise floor",
        forecaster.validation_mse()
    );
}

#[test]
fn test_detector_stays_quiet_on_clean_history() {
    let mut rng = StdRng::seed_from_u64(22);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
    let records = generate_history(now, 14, &mut rng);

    let detector = AnomalyDetector::fit(&records).expect("fit");
    let anomalies = detector.detect(&records);
    // Gaussian noise means the occasional tail sample, but the bulk of a
    // clean history must pass.
    assert!(
        anomalies.len() * 100 < records.len(),
        "{} of {} clean samples flagged",
        anomalies.len(),
        records.len()
    );
}

#[test]
fn test_forecast_drives_learned_allocation() {
    let mut rng = StdRng::seed_from_u64(23);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    let records = generate_history(now, 14, &mut rng);
    let forecaster = DemandForecaster::fit(&records).expect("fit");

    let mut optimizer =
        QLearningOptimizer::new(&OptimizerConfig::default()).expect("default config");
    optimizer.train(300, &mut rng);

    let (lag1, lag24) = lags_from_history(&records);
    let noon = records.last().unwrap();
    let demand = forecaster.predict(DemandFeatures {
        hour: noon.hour(),
        temperature_c: noon.temperature_c,
        solar_energy_kwh: noon.solar_energy_kwh,
        grid_load_kw: noon.grid_load_kw,
        lag1_kwh: lag1,
        lag24_kwh: lag24,
    });
    assert!(demand > 0.0, "noon demand should be positive");

    let decision = optimizer.render_allocation(noon.solar_energy_kwh, demand);
    assert!(
        (decision.renewable_used_kwh + decision.grid_used_kwh - demand).abs() < 0.01,
        "split must reassemble the forecast demand"
    );
    assert!((0.0..=100.0).contains(&decision.renewable_ratio_percent));
    assert!(
        decision.renewable_used_kwh > 0.0,
        "noon solar availability should put renewables in the mix"
    );
}
