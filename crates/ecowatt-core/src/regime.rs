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

//! Time-of-day discretization.

/// Map a wall-clock hour onto one of `regime_count` coarse operating regimes.
///
/// With the default three regimes this buckets hours into a repeating
/// morning/noon/evening cycle. Uses euclidean remainder so that negative
/// hours (e.g. timezone-shifted values) still land on a valid regime.
pub fn regime_of(hour: i64, regime_count: usize) -> usize {
    debug_assert!(regime_count > 0, "regime_count is validated at construction");
    hour.rem_euclid(regime_count as i64) as usize
}
