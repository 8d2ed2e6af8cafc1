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

//! Synthetic telemetry generation and the CSV telemetry store.
//!
//! Stands in for a real metering feed: a sinusoidal daily consumption
//! profile, a solar bell curve over daylight hours and gaussian noise on
//! every channel.

pub mod generator;
pub mod store;

mod error;

pub use error::{Result, SimulatorError};
pub use generator::{generate_history, sample_at};
pub use store::TelemetryStore;
