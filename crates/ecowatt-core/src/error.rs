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

//! Error types for the optimizer core

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("policy table needs at least one regime and one action, got {regimes}x{actions}")]
    InvalidDimension { regimes: usize, actions: usize },

    #[error("hyper-parameter {name} must be a finite value in [0, 1], got {value}")]
    InvalidHyperParameter { name: &'static str, value: f64 },

    #[error("expected {expected} action labels (one per table column), got {got}")]
    ActionLabelCount { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
