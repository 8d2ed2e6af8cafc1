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

//! The Q-learning optimizer and its training loop.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use ecowatt_types::OptimizerConfig;

use crate::action::AllocationAction;
use crate::error::{CoreError, Result};
use crate::policy::PolicyTable;
use crate::regime::regime_of;
use crate::reward::sample_reward;

/// Hours simulated per training episode (one simulated day).
pub const EPISODE_HOURS: i64 = 24;

/// Adaptive allocation optimizer.
///
/// Owns the only long-lived mutable state of the core: the policy table and
/// the `episodes_trained` counter. Training mutates both; the allocation
/// renderer and the metrics snapshot only read.
///
/// All stochastic paths take the RNG as a parameter so tests can drive the
/// optimizer with a seeded generator.
#[derive(Debug)]
pub struct QLearningOptimizer {
    table: PolicyTable,
    action_labels: Vec<String>,
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    renewable_boost: f64,
    episodes_trained: u64,
}

/// Summary of one `train` call, for logging and display only.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub episodes: usize,
    pub mean_episode_reward: f64,
    pub last_episode_reward: f64,
}

/// Read-only view of the learned policy for the observability surface.
///
/// Field names match the reference `/rl_metrics` payload.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyMetrics {
    pub q_table: Vec<Vec<f64>>,
    pub avg_rewards: Vec<f64>,
    pub actions: Vec<String>,
    pub episodes_trained: u64,
}

impl QLearningOptimizer {
    /// Build an untrained optimizer from configuration.
    ///
    /// Fails on a degenerate table shape, a label list that does not cover
    /// the action columns, or hyper-parameters outside [0, 1].
    pub fn new(config: &OptimizerConfig) -> Result<Self> {
        let table = PolicyTable::new(config.regime_count, AllocationAction::COUNT)?;
        if config.action_labels.len() != AllocationAction::COUNT {
            return Err(CoreError::ActionLabelCount {
                expected: AllocationAction::COUNT,
                got: config.action_labels.len(),
            });
        }
        validate_unit_interval("alpha", config.alpha)?;
        validate_unit_interval("gamma", config.gamma)?;
        validate_unit_interval("epsilon", config.epsilon)?;

        info!(
            "Initialized allocation optimizer: {} regimes x {} actions, alpha={}, gamma={}, epsilon={}",
            config.regime_count,
            AllocationAction::COUNT,
            config.alpha,
            config.gamma,
            config.epsilon
        );

        Ok(Self {
            table,
            action_labels: config.action_labels.clone(),
            alpha: config.alpha,
            gamma: config.gamma,
            epsilon: config.epsilon,
            renewable_boost: config.renewable_boost,
            episodes_trained: 0,
        })
    }

    /// Epsilon-greedy action choice for a regime.
    ///
    /// With probability epsilon a uniformly random action (exploration),
    /// otherwise the best-known action for the regime with ties broken at
    /// the earliest table column (exploitation). Read-only on the table.
    pub fn choose_action<R: Rng + ?Sized>(&self, regime: usize, rng: &mut R) -> AllocationAction {
        if rng.gen_range(0.0..1.0) < self.epsilon {
            let index = rng.gen_range(0..AllocationAction::COUNT);
            AllocationAction::ALL[index]
        } else {
            AllocationAction::from_index(self.table.best_action(regime))
                .unwrap_or(AllocationAction::GridOnly)
        }
    }

    /// Apply the temporal-difference update for one observed transition.
    pub fn learn(&mut self, regime: usize, action: AllocationAction, reward: f64, next_regime: usize) {
        self.table.apply_td_update(
            regime,
            action.index(),
            reward,
            next_regime,
            self.alpha,
            self.gamma,
        );
    }

    /// Simulate one 24-hour decision episode and fold every transition into
    /// the table. Returns the summed reward, which is observability only —
    /// nothing branches on it.
    pub fn run_episode<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let regimes = self.table.regimes();
        let mut total_reward = 0.0;
        for hour in 0..EPISODE_HOURS {
            let regime = regime_of(hour, regimes);
            let action = self.choose_action(regime, rng);
            let reward = sample_reward(action, rng);
            let next_regime = regime_of(hour + 1, regimes);
            self.learn(regime, action, reward, next_regime);
            total_reward += reward;
        }
        total_reward
    }

    /// Run `episodes` training episodes strictly in sequence.
    ///
    /// Each update depends on the table state left by the previous one, so
    /// episodes are never reordered or interleaved. Repeated calls keep
    /// accumulating into the same table and counter.
    pub fn train<R: Rng + ?Sized>(&mut self, episodes: usize, rng: &mut R) -> TrainingReport {
        info!("Training allocation optimizer for {episodes} episodes");

        let mut reward_sum = 0.0;
        let mut last_reward = 0.0;
        for episode in 0..episodes {
            last_reward = self.run_episode(rng);
            reward_sum += last_reward;
            if episode % 100 == 0 {
                debug!("episode {episode}: reward {last_reward:.2}");
            }
        }
        self.episodes_trained += episodes as u64;

        let report = TrainingReport {
            episodes,
            mean_episode_reward: if episodes > 0 { reward_sum / episodes as f64 } else { 0.0 },
            last_episode_reward: last_reward,
        };
        info!(
            "Training finished: {} episodes (lifetime {}), mean episode reward {:.2}",
            report.episodes, self.episodes_trained, report.mean_episode_reward
        );
        report
    }

    /// Snapshot of the learned policy for display.
    pub fn metrics(&self) -> PolicyMetrics {
        PolicyMetrics {
            q_table: self.table.snapshot(),
            avg_rewards: self.table.avg_value_per_regime(),
            actions: self.action_labels.clone(),
            episodes_trained: self.episodes_trained,
        }
    }

    /// Total episodes folded into the table over the optimizer's lifetime.
    pub fn episodes_trained(&self) -> u64 {
        self.episodes_trained
    }

    pub fn regime_count(&self) -> usize {
        self.table.regimes()
    }

    pub fn action_labels(&self) -> &[String] {
        &self.action_labels
    }

    pub(crate) fn table(&self) -> &PolicyTable {
        &self.table
    }

    pub(crate) fn renewable_boost(&self) -> f64 {
        self.renewable_boost
    }
}

fn validate_unit_interval(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(CoreError::InvalidHyperParameter { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_config() -> OptimizerConfig {
        OptimizerConfig::default()
    }

    #[test]
    fn test_new_optimizer_starts_untrained() {
        let optimizer = QLearningOptimizer::new(&test_config()).expect("default config is valid");
        assert_eq!(optimizer.episodes_trained(), 0);
        let metrics = optimizer.metrics();
        assert_eq!(metrics.q_table, vec![vec![0.0; 3]; 3]);
        assert_eq!(metrics.avg_rewards, vec![0.0; 3]);
        assert_eq!(metrics.actions, vec!["grid", "solar", "mix"]);
    }

    #[test]
    fn test_invalid_hyper_parameters_are_rejected() {
        let mut config = test_config();
        config.alpha = 1.5;
        assert_eq!(
            QLearningOptimizer::new(&config).unwrap_err(),
            CoreError::InvalidHyperParameter {
                name: "alpha",
                value: 1.5
            }
        );

        let mut config = test_config();
        config.epsilon = f64::NAN;
        assert!(matches!(
            QLearningOptimizer::new(&config).unwrap_err(),
            CoreError::InvalidHyperParameter { name: "epsilon", .. }
        ));
    }

    #[test]
    fn test_zero_regimes_are_rejected() {
        let mut config = test_config();
        config.regime_count = 0;
        assert_eq!(
            QLearningOptimizer::new(&config).unwrap_err(),
            CoreError::InvalidDimension {
                regimes: 0,
                actions: AllocationAction::COUNT
            }
        );
    }

    #[test]
    fn test_label_count_must_cover_columns() {
        let mut config = test_config();
        config.action_labels = vec!["grid".to_owned(), "solar".to_owned()];
        assert_eq!(
            QLearningOptimizer::new(&config).unwrap_err(),
            CoreError::ActionLabelCount {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_greedy_choice_on_zero_table_picks_first_action() {
        // epsilon = 0 makes the choice deterministic exploitation; on the
        // all-zero table the earliest column (grid) wins the tie.
        let mut config = test_config();
        config.epsilon = 0.0;
        let optimizer = QLearningOptimizer::new(&config).expect("valid config");
        let mut rng = StdRng::seed_from_u64(1);
        for regime in 0..optimizer.regime_count() {
            assert_eq!(
                optimizer.choose_action(regime, &mut rng),
                AllocationAction::GridOnly
            );
        }
    }

    #[test]
    fn test_episodes_trained_accumulates_across_calls() {
        let mut optimizer = QLearningOptimizer::new(&test_config()).expect("valid config");
        let mut rng = StdRng::seed_from_u64(3);
        optimizer.train(10, &mut rng);
        assert_eq!(optimizer.episodes_trained(), 10);
        optimizer.train(25, &mut rng);
        assert_eq!(optimizer.episodes_trained(), 35);
    }

    #[test]
    fn test_episode_reward_is_within_model_bounds() {
        // 24 steps, each reward in [3, 10].
        let mut optimizer = QLearningOptimizer::new(&test_config()).expect("valid config");
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let reward = optimizer.run_episode(&mut rng);
            assert!(
                (24.0 * 3.0..=24.0 * 10.0).contains(&reward),
                "episode reward {reward} outside feasible range"
            );
        }
    }

    #[test]
    fn test_training_learns_renewable_preference() {
        let mut optimizer = QLearningOptimizer::new(&test_config()).expect("valid config");
        let mut rng = StdRng::seed_from_u64(1234);
        optimizer.train(300, &mut rng);

        let preference = optimizer.table().action_preference();
        assert!(
            preference[AllocationAction::RenewableOnly.index()]
                > preference[AllocationAction::GridOnly.index()],
            "renewable column should dominate grid after training: {preference:?}"
        );
        for regime in 0..optimizer.regime_count() {
            assert_eq!(
                optimizer.table().best_action(regime),
                AllocationAction::RenewableOnly.index(),
                "regime {regime} should exploit the renewable action"
            );
        }
    }
}
