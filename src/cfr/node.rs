//! Information set nodes.
//!
//! A node accumulates the regret and strategy statistics of one decision
//! point. Both solvers share this type: the recursive solver keeps nodes in a
//! [`NodeStore`](crate::cfr::storage::NodeStore), the sweep solver in two
//! dense grids.

use serde::{Deserialize, Serialize};

use crate::cfr::error::SolverError;

/// Regret and strategy accumulators for one information set.
///
/// - **Regret sum**: cumulative counterfactual regret per action
/// - **Strategy**: the current regret-matched mixed strategy
/// - **Strategy sum**: realization-weighted cumulative strategy, whose
///   normalization is the average strategy reported after training
///
/// All three vectors have exactly `num_actions` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSetNode {
    regret_sum: Vec<f64>,
    strategy: Vec<f64>,
    strategy_sum: Vec<f64>,
}

impl InfoSetNode {
    /// Create a node with `num_actions` actions.
    ///
    /// The current strategy starts uniform; regrets and strategy sums start
    /// at zero.
    ///
    /// # Errors
    /// Returns [`SolverError::NoActions`] if `num_actions` is zero. `key` is
    /// only used to describe the failure.
    pub fn new(key: &str, num_actions: usize) -> Result<Self, SolverError> {
        if num_actions == 0 {
            return Err(SolverError::NoActions {
                key: key.to_string(),
            });
        }

        Ok(Self {
            regret_sum: vec![0.0; num_actions],
            strategy: uniform(num_actions),
            strategy_sum: vec![0.0; num_actions],
        })
    }

    /// Number of actions available at this information set.
    pub fn num_actions(&self) -> usize {
        self.regret_sum.len()
    }

    /// Derive the current strategy by regret matching.
    ///
    /// The strategy is proportional to positive regrets, or uniform if no
    /// action has positive regret. As a side effect the strategy is added to
    /// the strategy sum, weighted by `realization_weight` (the acting
    /// player's reach probability).
    pub fn get_strategy(&mut self, realization_weight: f64) -> &[f64] {
        let mut normalizing_sum = 0.0;
        for (s, &r) in self.strategy.iter_mut().zip(&self.regret_sum) {
            *s = r.max(0.0);
            normalizing_sum += *s;
        }

        let num_actions = self.strategy.len() as f64;
        for (s, sum) in self.strategy.iter_mut().zip(self.strategy_sum.iter_mut()) {
            if normalizing_sum > 0.0 {
                *s /= normalizing_sum;
            } else {
                *s = 1.0 / num_actions;
            }
            *sum += realization_weight * *s;
        }

        &self.strategy
    }

    /// The strategy computed by the most recent [`get_strategy`] call.
    ///
    /// [`get_strategy`]: InfoSetNode::get_strategy
    pub fn current_strategy(&self) -> &[f64] {
        &self.strategy
    }

    /// Average strategy across all iterations (Nash equilibrium approximation).
    ///
    /// Returns a fresh normalized vector; the strategy sum itself is left
    /// untouched.
    pub fn average_strategy(&self) -> Vec<f64> {
        let total: f64 = self.strategy_sum.iter().sum();
        if total > 0.0 {
            self.strategy_sum.iter().map(|&x| x / total).collect()
        } else {
            uniform(self.strategy_sum.len())
        }
    }

    /// Accumulate counterfactual regret.
    ///
    /// # Arguments
    /// * `action_utils` - Utility of each action for the acting player
    /// * `node_util` - Expected utility of the current strategy
    /// * `weight` - Reach probability of the opponent
    pub fn accumulate_regret(&mut self, action_utils: &[f64], node_util: f64, weight: f64) {
        debug_assert_eq!(action_utils.len(), self.regret_sum.len());

        for (regret, &util) in self.regret_sum.iter_mut().zip(action_utils) {
            *regret += weight * (util - node_util);
        }
    }

    /// Zero the strategy sum, keeping the accumulated regrets.
    pub fn reset_strategy_sum(&mut self) {
        self.strategy_sum.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Cumulative regrets.
    pub fn regret_sum(&self) -> &[f64] {
        &self.regret_sum
    }

    /// Cumulative strategy weights.
    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }
}

/// Expected value of a strategy against per-action utilities.
pub(crate) fn expected_value(strategy: &[f64], action_utils: &[f64]) -> f64 {
    strategy
        .iter()
        .zip(action_utils)
        .map(|(&s, &u)| s * u)
        .sum()
}

fn uniform(num_actions: usize) -> Vec<f64> {
    vec![1.0 / num_actions as f64; num_actions]
}
