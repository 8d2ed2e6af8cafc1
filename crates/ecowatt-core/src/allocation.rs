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

//! Rendering the learned policy into a concrete kWh allocation.

use serde::{Deserialize, Serialize};

use crate::action::AllocationAction;
use crate::optimizer::QLearningOptimizer;

/// The computed split of one demand figure between sources.
///
/// Ephemeral: recomputed per request from the current table snapshot, never
/// persisted. `renewable_used_kwh + grid_used_kwh` equals the requested
/// demand exactly; rounding for presentation happens at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationDecision {
    pub renewable_used_kwh: f64,
    pub grid_used_kwh: f64,
    /// Share of demand served by the renewable source, in [0, 100]
    pub renewable_ratio_percent: f64,
}

impl AllocationDecision {
    /// The degenerate "no demand to satisfy" decision.
    pub fn zero() -> Self {
        Self {
            renewable_used_kwh: 0.0,
            grid_used_kwh: 0.0,
            renewable_ratio_percent: 0.0,
        }
    }
}

impl QLearningOptimizer {
    /// Split a demand figure between the renewable and grid sources.
    ///
    /// Proportional arithmetic on the availability/demand ratio, nudged by
    /// the learned table: when the aggregate preference for the
    /// renewable-only action beats grid-only, the ratio is scaled by the
    /// configured boost (1.1 by default) before being clamped back to
    /// [0, 1].
    ///
    /// Inputs are best-effort; non-positive demand yields the zero decision
    /// rather than an error.
    pub fn render_allocation(&self, available_renewable_kwh: f64, demand_kwh: f64) -> AllocationDecision {
        if demand_kwh <= 0.0 {
            return AllocationDecision::zero();
        }

        let mut ratio = (available_renewable_kwh / demand_kwh).min(1.0);

        let preference = self.table().action_preference();
        if preference[AllocationAction::RenewableOnly.index()]
            > preference[AllocationAction::GridOnly.index()]
        {
            ratio *= self.renewable_boost();
        }
        ratio = ratio.clamp(0.0, 1.0);

        let renewable_used_kwh = demand_kwh * ratio;
        AllocationDecision {
            renewable_used_kwh,
            grid_used_kwh: demand_kwh - renewable_used_kwh,
            renewable_ratio_percent: ratio * 100.0,
        }
    }
}
