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

//! Adaptive energy allocation core.
//!
//! A tabular Q-learning optimizer that learns, through simulated decision
//! episodes, how to split demand between renewable and grid sources, plus
//! the renderer that turns the learned table and live forecast signals into
//! a concrete kWh allocation.

pub mod action;
pub mod allocation;
pub mod error;
pub mod optimizer;
pub mod policy;
pub mod regime;
pub mod reward;

pub use action::AllocationAction;
pub use allocation::AllocationDecision;
pub use error::{CoreError, Result};
pub use optimizer::{PolicyMetrics, QLearningOptimizer, TrainingReport};
pub use policy::PolicyTable;
pub use regime::regime_of;
pub use reward::sample_reward;
