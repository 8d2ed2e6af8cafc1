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

//! The closed set of allocation strategies the optimizer chooses between.

use serde::{Deserialize, Serialize};

/// One allocation strategy for a decision step.
///
/// The discriminants fix the column order of the policy table: grid-only is
/// column 0, renewable-only column 1, mixed column 2. The aggregate
/// preference comparison in the allocation renderer relies on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationAction {
    /// Serve all demand from the grid
    GridOnly = 0,
    /// Serve all demand from the renewable source
    RenewableOnly = 1,
    /// Split demand between both sources
    Mixed = 2,
}

impl AllocationAction {
    /// All actions in table column order.
    pub const ALL: [Self; 3] = [Self::GridOnly, Self::RenewableOnly, Self::Mixed];

    /// Number of actions (policy table columns).
    pub const COUNT: usize = Self::ALL.len();

    /// Column index of this action in the policy table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Action for a table column index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Default display label, matching the reference action names.
    pub fn label(self) -> &'static str {
        match self {
            Self::GridOnly => "grid",
            Self::RenewableOnly => "solar",
            Self::Mixed => "mix",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_is_grid_solar_mix() {
        assert_eq!(AllocationAction::GridOnly.index(), 0);
        assert_eq!(AllocationAction::RenewableOnly.index(), 1);
        assert_eq!(AllocationAction::Mixed.index(), 2);
    }

    #[test]
    fn test_from_index_round_trips() {
        for action in AllocationAction::ALL {
            assert_eq!(AllocationAction::from_index(action.index()), Some(action));
        }
        assert_eq!(AllocationAction::from_index(3), None);
    }
}
