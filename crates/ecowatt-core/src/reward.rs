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

//! Simulated reward signal for training episodes.

use rand::Rng;

use crate::action::AllocationAction;

/// Sample the reward for taking an action during a simulated hour.
///
/// Depends on the action only, not on the regime, and encodes the
/// sustainability preference renewable > mixed > grid:
///
/// - renewable-only: `10 - U(0,1) * 2`, bounded [8, 10]
/// - mixed: constant 7
/// - grid-only: `4 - U(0,1)`, bounded [3, 4]
pub fn sample_reward<R: Rng + ?Sized>(action: AllocationAction, rng: &mut R) -> f64 {
    match action {
        AllocationAction::RenewableOnly => 10.0 - rng.gen_range(0.0..1.0) * 2.0,
        AllocationAction::Mixed => 7.0,
        AllocationAction::GridOnly => 4.0 - rng.gen_range(0.0..1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rewards_stay_within_documented_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let renewable = sample_reward(AllocationAction::RenewableOnly, &mut rng);
            assert!((8.0..=10.0).contains(&renewable), "renewable reward {renewable} out of [8, 10]");

            let mixed = sample_reward(AllocationAction::Mixed, &mut rng);
            assert_eq!(mixed, 7.0);

            let grid = sample_reward(AllocationAction::GridOnly, &mut rng);
            assert!((3.0..=4.0).contains(&grid), "grid reward {grid} out of [3, 4]");
        }
    }

    #[test]
    fn test_reward_ordering_prefers_renewables() {
        // Bounds do not overlap, so the ordering holds for every draw,
        // not just in expectation.
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let renewable = sample_reward(AllocationAction::RenewableOnly, &mut rng);
            let mixed = sample_reward(AllocationAction::Mixed, &mut rng);
            let grid = sample_reward(AllocationAction::GridOnly, &mut rng);
            assert!(renewable > mixed && mixed > grid);
        }
    }
}
