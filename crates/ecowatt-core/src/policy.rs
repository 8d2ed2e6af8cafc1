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

//! Dense value table over (regime, action) pairs.

use crate::error::{CoreError, Result};

/// The learned value table: rows are time-of-day regimes, columns are
/// allocation actions, every cell holds the estimated long-run value of
/// taking that action in that regime.
///
/// The shape is fixed for the lifetime of the table and the single mutation
/// path is [`PolicyTable::apply_td_update`].
#[derive(Debug, Clone)]
pub struct PolicyTable {
    /// Row-major cell storage, `regimes * actions` entries
    cells: Vec<f64>,
    regimes: usize,
    actions: usize,
}

impl PolicyTable {
    /// Create an all-zero table. Fails for a degenerate shape rather than
    /// silently producing a table no action choice can ever index into.
    pub fn new(regimes: usize, actions: usize) -> Result<Self> {
        if regimes == 0 || actions == 0 {
            return Err(CoreError::InvalidDimension { regimes, actions });
        }
        Ok(Self {
            cells: vec![0.0; regimes * actions],
            regimes,
            actions,
        })
    }

    pub fn regimes(&self) -> usize {
        self.regimes
    }

    pub fn actions(&self) -> usize {
        self.actions
    }

    /// Current value of one cell.
    pub fn value(&self, regime: usize, action: usize) -> f64 {
        self.cells[self.cell_index(regime, action)]
    }

    /// Temporal-difference update of a single cell:
    /// `q[s][a] += alpha * (reward + gamma * max(q[s']) - q[s][a])`.
    pub fn apply_td_update(
        &mut self,
        regime: usize,
        action: usize,
        reward: f64,
        next_regime: usize,
        alpha: f64,
        gamma: f64,
    ) {
        let target = reward + gamma * self.max_value(next_regime);
        let index = self.cell_index(regime, action);
        let predict = self.cells[index];
        self.cells[index] += alpha * (target - predict);
    }

    /// Column index of the best-known action for a regime, earliest column
    /// winning ties (so an untrained all-zero table picks column 0).
    pub fn best_action(&self, regime: usize) -> usize {
        let row = self.row(regime);
        let mut best = 0;
        for (column, &value) in row.iter().enumerate() {
            if value > row[best] {
                best = column;
            }
        }
        best
    }

    /// Highest cell value in a regime's row.
    pub fn max_value(&self, regime: usize) -> f64 {
        self.row(regime).iter().copied().fold(f64::MIN, f64::max)
    }

    /// Column-wise mean across regimes: the aggregate preference the
    /// allocation renderer compares renewable-only against grid-only with.
    pub fn action_preference(&self) -> Vec<f64> {
        let mut means = vec![0.0; self.actions];
        for regime in 0..self.regimes {
            for (column, mean) in means.iter_mut().enumerate() {
                *mean += self.value(regime, column);
            }
        }
        for mean in &mut means {
            *mean /= self.regimes as f64;
        }
        means
    }

    /// Row-wise mean over actions, one entry per regime. Observability only.
    pub fn avg_value_per_regime(&self) -> Vec<f64> {
        (0..self.regimes)
            .map(|regime| self.row(regime).iter().sum::<f64>() / self.actions as f64)
            .collect()
    }

    /// Copy of the table as nested rows, for serialization and display.
    pub fn snapshot(&self) -> Vec<Vec<f64>> {
        (0..self.regimes).map(|r| self.row(r).to_vec()).collect()
    }

    fn row(&self, regime: usize) -> &[f64] {
        let start = regime * self.actions;
        &self.cells[start..start + self.actions]
    }

    fn cell_index(&self, regime: usize, action: usize) -> usize {
        assert!(regime < self.regimes, "regime {regime} out of range");
        assert!(action < self.actions, "action {action} out of range");
        regime * self.actions + action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_all_zeros() {
        let table = PolicyTable::new(3, 3).expect("3x3 is a valid shape");
        for regime in 0..3 {
            for action in 0..3 {
                assert_eq!(table.value(regime, action), 0.0);
            }
        }
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        assert_eq!(
            PolicyTable::new(0, 3).unwrap_err(),
            CoreError::InvalidDimension {
                regimes: 0,
                actions: 3
            }
        );
        assert_eq!(
            PolicyTable::new(3, 0).unwrap_err(),
            CoreError::InvalidDimension {
                regimes: 3,
                actions: 0
            }
        );
    }

    #[test]
    fn test_td_update_moves_cell_toward_target() {
        let mut table = PolicyTable::new(2, 2).expect("valid shape");
        // All zeros, reward 10: target = 10 + 0.9 * 0, delta = 0.1 * 10.
        table.apply_td_update(0, 1, 10.0, 1, 0.1, 0.9);
        assert!((table.value(0, 1) - 1.0).abs() < 1e-12);

        // Second update now sees max(q[next]) = 0 still, cell at 1.0:
        // q += 0.1 * (10 - 1) = 0.9 -> 1.9
        table.apply_td_update(0, 1, 10.0, 1, 0.1, 0.9);
        assert!((table.value(0, 1) - 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_td_update_discounts_next_regime_value() {
        let mut table = PolicyTable::new(2, 2).expect("valid shape");
        table.apply_td_update(1, 0, 10.0, 0, 1.0, 0.0); // q[1][0] = 10
        table.apply_td_update(0, 0, 0.0, 1, 1.0, 0.9);
        assert!(
            (table.value(0, 0) - 9.0).abs() < 1e-12,
            "cell should pick up gamma * max of next regime"
        );
    }

    #[test]
    fn test_best_action_breaks_ties_at_earliest_column() {
        let table = PolicyTable::new(3, 3).expect("valid shape");
        for regime in 0..3 {
            assert_eq!(table.best_action(regime), 0, "all-zero row ties to column 0");
        }
    }

    #[test]
    fn test_best_action_follows_highest_value() {
        let mut table = PolicyTable::new(1, 3).expect("valid shape");
        table.apply_td_update(0, 2, 5.0, 0, 1.0, 0.0);
        assert_eq!(table.best_action(0), 2);
    }

    #[test]
    fn test_action_preference_averages_columns() {
        let mut table = PolicyTable::new(2, 2).expect("valid shape");
        table.apply_td_update(0, 1, 4.0, 0, 1.0, 0.0);
        table.apply_td_update(1, 1, 8.0, 0, 1.0, 0.0);
        let preference = table.action_preference();
        assert_eq!(preference[0], 0.0);
        assert!((preference[1] - 6.0).abs() < 1e-12);
    }
}
