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

use serde::{Deserialize, Serialize};

// ============= System Configuration =============

/// Central configuration for the EcoWatt backend
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EcowattConfig {
    #[serde(default, rename = "optimizer")]
    pub optimizer: OptimizerConfig,
    #[serde(default, rename = "simulator")]
    pub simulator: SimulatorConfig,
    #[serde(default, rename = "server")]
    pub server: ServerSettings,
}

/// Q-learning optimizer configuration
///
/// The defaults reproduce the reference parameterization: three time-of-day
/// regimes (morning/noon/evening), three allocation actions, and the usual
/// tabular Q-learning hyper-parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Number of coarse time-of-day buckets used as the state dimension
    #[serde(default = "default_regime_count")]
    pub regime_count: usize,

    /// Display labels for the allocation actions, in table column order
    /// (grid-only, renewable-only, mixed)
    #[serde(default = "default_action_labels")]
    pub action_labels: Vec<String>,

    /// Learning rate applied by the temporal-difference update
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Discount factor for the value of the next regime
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// Exploration probability for the epsilon-greedy action choice
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Episodes to run at startup before the API starts serving
    #[serde(default = "default_training_episodes")]
    pub training_episodes: usize,

    /// Multiplier nudging the allocation ratio toward renewables when the
    /// learned table prefers the renewable-only action over grid-only.
    /// Tunable; the clamp to [0, 1] applies after the boost.
    #[serde(default = "default_renewable_boost")]
    pub renewable_boost: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            regime_count: default_regime_count(),
            action_labels: default_action_labels(),
            alpha: default_alpha(),
            gamma: default_gamma(),
            epsilon: default_epsilon(),
            training_episodes: default_training_episodes(),
            renewable_boost: default_renewable_boost(),
        }
    }
}

/// Synthetic telemetry generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Days of hourly history generated when no telemetry file exists
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// Seconds between appended live samples when running `ecowatt simulate --live`
    #[serde(default = "default_live_interval_secs")]
    pub live_interval_secs: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            history_days: default_history_days(),
            live_interval_secs: default_live_interval_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the CSV telemetry store shared with the simulator
    #[serde(default = "default_telemetry_csv_path")]
    pub telemetry_csv_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            telemetry_csv_path: default_telemetry_csv_path(),
        }
    }
}

// Default value functions for serde
fn default_regime_count() -> usize {
    3
}
fn default_action_labels() -> Vec<String> {
    vec!["grid".to_owned(), "solar".to_owned(), "mix".to_owned()]
}
fn default_alpha() -> f64 {
    0.1
}
fn default_gamma() -> f64 {
    0.9
}
fn default_epsilon() -> f64 {
    0.1
}
fn default_training_episodes() -> usize {
    300
}
fn default_renewable_boost() -> f64 {
    1.1
}
fn default_history_days() -> u32 {
    14
}
fn default_live_interval_secs() -> u64 {
    5
}
fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}
fn default_port() -> u16 {
    8000
}
fn default_telemetry_csv_path() -> String {
    "./data/energy_data.csv".to_owned()
}
