//! Fixed-Strategy Iteration CFR (FSICFR) for claim-escalation games.
//!
//! Liar Die style games have a small, acyclic set of decision points that can
//! be laid out in two dense grids:
//!
//! - **Response nodes** `(my_claim, opp_claim)`: the opponent answered my
//!   claim `my_claim` with `opp_claim`; I either doubt or accept
//! - **Claim nodes** `(opp_claim, roll)`: I accepted `opp_claim`, rolled
//!   `roll`, and must make a strictly higher claim
//!
//! Instead of recursing, each iteration draws one roll per claim level and
//! then makes two passes over the grids:
//!
//! 1. **Forward**, in ascending claim order: every visited node computes its
//!    regret-matched strategy and pushes reach probabilities to its
//!    successors
//! 2. **Backward**, in descending claim order: every visited node computes
//!    its utility from its successors, accumulates regret weighted by the
//!    opponent's reach, and clears its reach for the next iteration

use std::mem;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cfr::config::{CFRStats, ConfigError, SolverConfig};
use crate::cfr::error::SolverError;
use crate::cfr::game::EscalationModel;
use crate::cfr::node::{expected_value, InfoSetNode};
use crate::cfr::report::{StrategyLine, StrategyReport};

/// Response action: doubt the claim.
pub const DOUBT: usize = 0;
/// Response action: accept the claim and roll.
pub const ACCEPT: usize = 1;

const PROGRESS_LOG_INTERVAL: u64 = 1_000;

/// A grid node plus the per-iteration scratch values of the sweep.
#[derive(Debug, Clone)]
struct SweepNode {
    node: InfoSetNode,
    /// Reach probability of the player acting here.
    reach_player: f64,
    /// Reach probability of the other player.
    reach_opponent: f64,
    /// Utility for the acting player, set by the backward pass.
    utility: f64,
}

impl SweepNode {
    fn new(key: &str, num_actions: usize) -> Result<Self, SolverError> {
        Ok(Self {
            node: InfoSetNode::new(key, num_actions)?,
            reach_player: 0.0,
            reach_opponent: 0.0,
            utility: 0.0,
        })
    }

    fn clear(&mut self) {
        self.reach_player = 0.0;
        self.reach_opponent = 0.0;
        self.utility = 0.0;
    }

    fn take_reach(&mut self) -> (f64, f64) {
        (
            mem::take(&mut self.reach_player),
            mem::take(&mut self.reach_opponent),
        )
    }
}

/// The FSICFR solver.
///
/// Grid nodes are allocated once at construction; training never allocates
/// nodes.
///
/// # Example
/// ```
/// use cfr_practice::cfr::{SolverConfig, SweepSolver};
/// use cfr_practice::games::liars_die::LiarDie;
///
/// let config = SolverConfig::default().with_seed(1);
/// let mut solver = SweepSolver::new(LiarDie::new(6).unwrap(), config).unwrap();
/// solver.train(1_000).unwrap();
///
/// let policy = solver.initial_claim_policy(3).unwrap();
/// assert_eq!(policy.len(), 6);
/// ```
pub struct SweepSolver<M: EscalationModel> {
    model: M,
    config: SolverConfig,
    sides: usize,

    /// Indexed `[my_claim][opp_claim - my_claim - 1]` for
    /// `0 <= my_claim < opp_claim <= sides`.
    response_nodes: Vec<Vec<SweepNode>>,

    /// Indexed `[opp_claim][roll - 1]` for `opp_claim < sides`.
    claim_nodes: Vec<Vec<SweepNode>>,

    /// Roll made after accepting each claim level, for the current iteration.
    rolls: Vec<usize>,

    iteration: u64,
    stats: CFRStats,
    rng: StdRng,
}

impl<M: EscalationModel> SweepSolver<M> {
    /// Create a solver and allocate both grids.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidSides`] if the model has fewer than 2 sides
    /// - any configuration validation error
    pub fn new(model: M, config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;

        let sides = model.sides();
        if sides < 2 {
            return Err(ConfigError::InvalidSides(sides).into());
        }

        let mut response_nodes = Vec::with_capacity(sides);
        for my_claim in 0..sides {
            let row = (my_claim + 1..=sides)
                .map(|opp_claim| {
                    let num_actions = if opp_claim == sides { 1 } else { 2 };
                    SweepNode::new(&format!("{}/{}", my_claim, opp_claim), num_actions)
                })
                .collect::<Result<Vec<_>, _>>()?;
            response_nodes.push(row);
        }

        let mut claim_nodes = Vec::with_capacity(sides);
        for opp_claim in 0..sides {
            let row = (1..=sides)
                .map(|roll| SweepNode::new(&format!("{}/{}", opp_claim, roll), sides - opp_claim))
                .collect::<Result<Vec<_>, _>>()?;
            claim_nodes.push(row);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            model,
            config,
            sides,
            response_nodes,
            claim_nodes,
            rolls: vec![1; sides],
            iteration: 0,
            stats: CFRStats::new(),
            rng,
        })
    }

    /// Run one forward/backward sweep.
    ///
    /// # Returns
    /// Utility of the root claim node for the first claimer.
    ///
    /// # Errors
    /// [`SolverError::InvalidRoll`] if the model rolls outside `1..=sides`.
    /// No node is touched in that case.
    pub fn run_iteration(&mut self) -> Result<f64, SolverError> {
        let sides = self.sides;
        for level in 0..sides {
            let roll = self.model.roll(&mut self.rng);
            if roll == 0 || roll > sides {
                return Err(SolverError::InvalidRoll { roll, sides });
            }
            self.rolls[level] = roll;
        }

        let trace = self.config.traces(self.iteration);
        if trace {
            log::trace!("[iter: {}] rolls: {:?}", self.iteration + 1, self.rolls);
        }

        self.start_sweep();
        self.forward();
        let util = self.backward(trace);

        self.iteration += 1;
        self.stats.total_utility += util;
        Ok(util)
    }

    /// Clear every node's scratch values and seed the root claim node.
    fn start_sweep(&mut self) {
        for node in self
            .response_nodes
            .iter_mut()
            .chain(self.claim_nodes.iter_mut())
            .flatten()
        {
            node.clear();
        }

        let root = &mut self.claim_nodes[0][self.rolls[0] - 1];
        root.reach_player = 1.0;
        root.reach_opponent = 1.0;
    }

    fn forward(&mut self) {
        let sides = self.sides;

        for opp_claim in 0..=sides {
            for my_claim in 0..opp_claim {
                let response = &mut self.response_nodes[my_claim][opp_claim - my_claim - 1];
                let (p_player, p_opponent) = (response.reach_player, response.reach_opponent);
                let accept = response
                    .node
                    .get_strategy(p_player)
                    .get(ACCEPT)
                    .copied()
                    .unwrap_or(0.0);

                if opp_claim < sides {
                    let roll = self.rolls[opp_claim];
                    let next = &mut self.claim_nodes[opp_claim][roll - 1];
                    next.reach_player += accept * p_player;
                    next.reach_opponent += p_opponent;
                }
            }

            if opp_claim < sides {
                let roll = self.rolls[opp_claim];
                let claim = &mut self.claim_nodes[opp_claim][roll - 1];
                let (p_player, p_opponent) = (claim.reach_player, claim.reach_opponent);
                let strategy = claim.node.get_strategy(p_player);

                // action a claims opp_claim + 1 + a
                for (a, &prob) in strategy.iter().enumerate() {
                    if prob > 0.0 {
                        let next = &mut self.response_nodes[opp_claim][a];
                        next.reach_player += p_opponent;
                        next.reach_opponent += prob * p_player;
                    }
                }
            }
        }
    }

    fn backward(&mut self, trace: bool) -> f64 {
        let sides = self.sides;

        for opp_claim in (0..=sides).rev() {
            if opp_claim < sides {
                let action_utils: Vec<f64> = self.response_nodes[opp_claim]
                    .iter()
                    .map(|response| -response.utility)
                    .collect();

                let roll = self.rolls[opp_claim];
                let claim = &mut self.claim_nodes[opp_claim][roll - 1];
                let util = expected_value(claim.node.current_strategy(), &action_utils);
                let (_, p_opponent) = claim.take_reach();
                claim.node.accumulate_regret(&action_utils, util, p_opponent);
                claim.utility = util;

                if trace {
                    log::trace!("claim {}/{}\tutil {:.4}", opp_claim, roll, util);
                }
            }

            let accept_util = if opp_claim < sides {
                Some(self.claim_nodes[opp_claim][self.rolls[opp_claim] - 1].utility)
            } else {
                None
            };

            for my_claim in 0..opp_claim {
                // The opponent rolled rolls[my_claim] after accepting my claim.
                let doubt_util = self.model.doubt_payoff(opp_claim, self.rolls[my_claim]);
                let mut action_utils = vec![doubt_util];
                action_utils.extend(accept_util);

                let response = &mut self.response_nodes[my_claim][opp_claim - my_claim - 1];
                let util = expected_value(response.node.current_strategy(), &action_utils);
                let (_, p_opponent) = response.take_reach();
                response.node.accumulate_regret(&action_utils, util, p_opponent);
                response.utility = util;
            }
        }

        self.claim_nodes[0][self.rolls[0] - 1].utility
    }

    /// Train for `iterations` sweeps.
    ///
    /// Strategy sums are reset once, at the end of the sweep whose 0-based
    /// index is `iterations / 2`.
    pub fn train(&mut self, iterations: u64) -> Result<&CFRStats, SolverError> {
        self.train_with_callback(iterations, 0, |_| {})
    }

    /// Train with a callback invoked every `callback_interval` sweeps
    /// (0 never calls it).
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&CFRStats, SolverError>
    where
        F: FnMut(&CFRStats),
    {
        if iterations == 0 {
            return Err(ConfigError::InvalidIterations.into());
        }

        let start_time = Instant::now();
        let elapsed_before = self.stats.elapsed_seconds;

        for i in 0..iterations {
            self.run_iteration()?;

            if i == iterations / 2 {
                log::debug!("[iter: {}] resetting strategy sums", self.iteration);
                self.reset_strategy_sums();
            }

            if self.iteration == 1 || self.iteration % PROGRESS_LOG_INTERVAL == 0 {
                log::debug!(
                    "[iter: {}] avg_util: {:.6}",
                    self.iteration,
                    self.stats.total_utility / self.iteration as f64
                );
            }

            if callback_interval > 0 && (i + 1) % callback_interval == 0 {
                self.refresh_stats(elapsed_before + start_time.elapsed().as_secs_f64());
                callback(&self.stats);
            }
        }

        self.refresh_stats(elapsed_before + start_time.elapsed().as_secs_f64());
        log::info!(
            "swept {} iterations over {} nodes, average game value {:.4}",
            self.stats.iterations,
            self.stats.info_sets,
            self.stats.average_game_value()
        );

        Ok(&self.stats)
    }

    fn refresh_stats(&mut self, elapsed_seconds: f64) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.num_nodes();
        self.stats.elapsed_seconds = elapsed_seconds;
        self.stats.update_rate();
    }

    /// Zero the strategy sums of every node in both grids. Regrets are kept.
    pub fn reset_strategy_sums(&mut self) {
        for sweep_node in self
            .response_nodes
            .iter_mut()
            .chain(self.claim_nodes.iter_mut())
            .flatten()
        {
            sweep_node.node.reset_strategy_sum();
        }
    }

    /// Average policy for the opening claim after rolling `roll`.
    ///
    /// Entry `i` is the probability of claiming `i + 1`.
    pub fn initial_claim_policy(&self, roll: usize) -> Option<Vec<f64>> {
        self.claim_node(0, roll).map(InfoSetNode::average_strategy)
    }

    /// Response node for `opp_claim` following `my_claim`.
    ///
    /// Actions are [`DOUBT`] and, when `opp_claim < sides`, [`ACCEPT`].
    pub fn response_node(&self, my_claim: usize, opp_claim: usize) -> Option<&InfoSetNode> {
        if my_claim >= opp_claim {
            return None;
        }
        self.response_nodes
            .get(my_claim)
            .and_then(|row| row.get(opp_claim - my_claim - 1))
            .map(|sweep_node| &sweep_node.node)
    }

    /// Claim node after accepting `opp_claim` and rolling `roll`.
    ///
    /// Action `i` claims `opp_claim + 1 + i`.
    pub fn claim_node(&self, opp_claim: usize, roll: usize) -> Option<&InfoSetNode> {
        if roll == 0 {
            return None;
        }
        self.claim_nodes
            .get(opp_claim)
            .and_then(|row| row.get(roll - 1))
            .map(|sweep_node| &sweep_node.node)
    }

    /// Average strategies of all response nodes, keyed `"<my>/<opp>"` in
    /// grid order.
    pub fn response_table(&self) -> StrategyReport {
        let lines = self
            .response_nodes
            .iter()
            .enumerate()
            .flat_map(|(my_claim, row)| {
                row.iter().enumerate().map(move |(i, sweep_node)| StrategyLine {
                    key: format!("{}/{}", my_claim, my_claim + 1 + i),
                    strategy: sweep_node.node.average_strategy(),
                })
            })
            .collect();

        StrategyReport::new(lines, self.config.report_precision)
    }

    /// Average strategies of all claim nodes, keyed `"<opp>/<roll>"` in grid
    /// order, followed by the average game value.
    pub fn claim_table(&self) -> StrategyReport {
        let lines = self
            .claim_nodes
            .iter()
            .enumerate()
            .flat_map(|(opp_claim, row)| {
                row.iter().enumerate().map(move |(i, sweep_node)| StrategyLine {
                    key: format!("{}/{}", opp_claim, i + 1),
                    strategy: sweep_node.node.average_strategy(),
                })
            })
            .collect();

        StrategyReport::new(lines, self.config.report_precision)
            .with_game_value(self.average_game_value())
    }

    /// Mean utility of the root claim node across all sweeps.
    pub fn average_game_value(&self) -> f64 {
        self.stats.total_utility / self.iteration.max(1) as f64
    }

    /// Rolls drawn for the most recent sweep, one per claim level.
    pub fn rolls(&self) -> &[usize] {
        &self.rolls
    }

    /// Total number of grid nodes.
    pub fn num_nodes(&self) -> usize {
        self.response_nodes
            .iter()
            .chain(self.claim_nodes.iter())
            .map(Vec::len)
            .sum()
    }

    /// Number of sides of the die.
    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Sweeps completed so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::liars_die::LiarDie;
    use rand::Rng;

    fn solver(sides: usize, seed: u64) -> SweepSolver<LiarDie> {
        let config = SolverConfig::default().with_seed(seed).with_trace_interval(None);
        SweepSolver::new(LiarDie::new(sides).unwrap(), config).unwrap()
    }

    fn all_nodes<M: EscalationModel>(solver: &SweepSolver<M>) -> Vec<&InfoSetNode> {
        solver
            .response_nodes
            .iter()
            .chain(solver.claim_nodes.iter())
            .flatten()
            .map(|sweep_node| &sweep_node.node)
            .collect()
    }

    #[test]
    fn test_grid_shape() {
        let solver = solver(6, 1);
        assert_eq!(solver.num_nodes(), 21 + 36);

        assert_eq!(solver.response_node(0, 1).unwrap().num_actions(), 2);
        assert_eq!(solver.response_node(4, 5).unwrap().num_actions(), 2);
        assert_eq!(solver.response_node(2, 6).unwrap().num_actions(), 1);
        assert!(solver.response_node(3, 3).is_none());
        assert!(solver.response_node(0, 7).is_none());

        assert_eq!(solver.claim_node(0, 1).unwrap().num_actions(), 6);
        assert_eq!(solver.claim_node(5, 6).unwrap().num_actions(), 1);
        assert!(solver.claim_node(6, 1).is_none());
        assert!(solver.claim_node(0, 0).is_none());
        assert!(solver.claim_node(0, 7).is_none());
    }

    #[test]
    fn test_rejects_too_few_sides() {
        struct Coin(usize);

        impl EscalationModel for Coin {
            fn sides(&self) -> usize {
                self.0
            }

            fn doubt_payoff(&self, claim: usize, roll: usize) -> f64 {
                if claim > roll {
                    1.0
                } else {
                    -1.0
                }
            }
        }

        let config = SolverConfig::default();
        for sides in [0, 1] {
            let err = SweepSolver::new(Coin(sides), config.clone()).err();
            assert_eq!(err, Some(SolverError::Config(ConfigError::InvalidSides(sides))));
        }
        assert!(SweepSolver::new(Coin(2), config).is_ok());
    }

    #[test]
    fn test_first_sweep_values_include_doubt() {
        let mut solver = solver(2, 9);
        let util = solver.run_iteration().unwrap();
        let r = solver.rolls().to_vec();
        let doubt = |claim: usize, roll: usize| if claim > roll { 1.0 } else { -1.0 };

        // Every strategy is uniform on the first sweep.
        let u_0_2 = doubt(2, r[0]);
        let u_1_2 = doubt(2, r[1]);
        let claim_1 = -u_1_2;
        let u_0_1 = 0.5 * doubt(1, r[0]) + 0.5 * claim_1;
        let root = 0.5 * -u_0_1 + 0.5 * -u_0_2;
        assert!((util - root).abs() < 1e-12, "{} vs {}", util, root);

        // Response (0, 1) is reached by the opponent claiming 1 with p = 0.5.
        let regrets = solver.response_node(0, 1).unwrap().regret_sum();
        assert!((regrets[DOUBT] - 0.5 * (doubt(1, r[0]) - u_0_1)).abs() < 1e-12);
        assert!((regrets[ACCEPT] - 0.5 * (claim_1 - u_0_1)).abs() < 1e-12);
    }

    #[test]
    fn test_reach_is_cleared_after_sweep() {
        let mut solver = solver(4, 2);
        solver.run_iteration().unwrap();

        for sweep_node in solver
            .response_nodes
            .iter()
            .chain(solver.claim_nodes.iter())
            .flatten()
        {
            assert_eq!(sweep_node.reach_player, 0.0);
            assert_eq!(sweep_node.reach_opponent, 0.0);
        }
    }

    #[test]
    fn test_mid_training_reset() {
        let mut trained = solver(6, 4);
        trained.train(1).unwrap();

        let mut single = solver(6, 4);
        single.run_iteration().unwrap();

        // The only sweep has index 0 == 1 / 2, so its strategy sums are gone.
        for (after_reset, plain) in all_nodes(&trained).into_iter().zip(all_nodes(&single)) {
            assert!(after_reset.strategy_sum().iter().all(|&s| s == 0.0));
            assert_eq!(after_reset.regret_sum(), plain.regret_sum());
        }
        assert!(all_nodes(&single)
            .iter()
            .any(|node| node.strategy_sum().iter().any(|&s| s > 0.0)));
    }

    #[test]
    fn test_liar_die_training() {
        let mut solver = solver(6, 1);
        let stats = solver.train(10_000).unwrap();
        assert_eq!(stats.iterations, 10_000);
        assert_eq!(stats.info_sets, 57);

        for roll in 1..=6 {
            let policy = solver.initial_claim_policy(roll).unwrap();
            assert_eq!(policy.len(), 6);
            let sum: f64 = policy.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "roll {}: {:?}", roll, policy);
        }

        for node in all_nodes(&solver) {
            assert!(node.regret_sum().iter().all(|r| r.is_finite()));
            let sum: f64 = node.average_strategy().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }

        // A claim of 1 can never be beaten by doubting it.
        let vs_one = solver.response_node(0, 1).unwrap().average_strategy();
        assert!(vs_one[ACCEPT] > 0.9, "should accept a claim of 1: {:?}", vs_one);

        assert!(solver.average_game_value().abs() <= 1.0);
    }

    #[test]
    fn test_tables() {
        let mut solver = solver(3, 6);
        solver.train(200).unwrap();

        let responses = solver.response_table();
        let keys: Vec<&str> = responses.lines.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["0/1", "0/2", "0/3", "1/2", "1/3", "2/3"]);
        assert_eq!(responses.lines[2].strategy, vec![1.0]);
        assert!(responses.game_value.is_none());

        let claims = solver.claim_table();
        assert_eq!(claims.lines.len(), 9);
        assert_eq!(claims.lines[0].key, "0/1");
        assert_eq!(claims.lines[8].key, "2/3");
        assert_eq!(claims.game_value, Some(solver.average_game_value()));
    }

    #[test]
    fn test_same_seed_same_tables() {
        let mut first = solver(6, 42);
        let mut second = solver(6, 42);
        first.train(500).unwrap();
        second.train(500).unwrap();

        assert_eq!(first.rolls(), second.rolls());
        assert_eq!(first.claim_table(), second.claim_table());
        assert_eq!(first.response_table(), second.response_table());
    }

    #[test]
    fn test_claim_node_reach_and_regret_weighting() {
        let mut solver = solver(3, 1);
        solver.rolls = vec![1, 1, 1];
        solver.start_sweep();
        solver.forward();

        // Uniform strategies everywhere. The level-1 claimer accepted a claim
        // of 1 with p = 1/2; the opponent made it with p = 1/3.
        let level_1 = &solver.claim_nodes[1][0];
        assert!((level_1.reach_player - 0.5).abs() < 1e-12);
        assert!((level_1.reach_opponent - 1.0 / 3.0).abs() < 1e-12);

        // Reached through responses (0, 2) and (1, 2).
        let level_2 = &solver.claim_nodes[2][0];
        assert!((level_2.reach_player - (0.5 + 1.0 / 6.0)).abs() < 1e-12);
        assert!((level_2.reach_opponent - (1.0 / 3.0 + 0.25)).abs() < 1e-12);

        let root = solver.backward(false);
        assert!(root.is_finite());

        // Claiming 3 is always doubted (-1); claiming 2 is worth 0 against a
        // uniform response. Node value -0.5, regrets weighted by 1/3.
        let regrets = solver.claim_node(1, 1).unwrap().regret_sum();
        assert!((regrets[0] - 1.0 / 6.0).abs() < 1e-12, "{:?}", regrets);
        assert!((regrets[1] + 1.0 / 6.0).abs() < 1e-12, "{:?}", regrets);
        assert_eq!(solver.claim_node(2, 1).unwrap().regret_sum(), &[0.0]);
    }

    #[test]
    fn test_out_of_range_roll_rejected() {
        struct Loaded(usize);

        impl EscalationModel for Loaded {
            fn sides(&self) -> usize {
                3
            }

            fn doubt_payoff(&self, claim: usize, roll: usize) -> f64 {
                if claim > roll {
                    1.0
                } else {
                    -1.0
                }
            }

            fn roll<R: Rng + ?Sized>(&self, _rng: &mut R) -> usize {
                self.0
            }
        }

        let config = SolverConfig::default().with_seed(1).with_trace_interval(None);
        for roll in [0, 4] {
            let mut solver = SweepSolver::new(Loaded(roll), config.clone()).unwrap();
            let err = solver.run_iteration().unwrap_err();
            assert_eq!(err, SolverError::InvalidRoll { roll, sides: 3 });
            assert_eq!(solver.iteration(), 0);
        }

        let mut solver = SweepSolver::new(Loaded(3), config).unwrap();
        assert!(solver.run_iteration().is_ok());
        assert_eq!(solver.rolls(), &[3, 3, 3]);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut solver = solver(6, 1);
        let err = solver.train(0).unwrap_err();
        assert_eq!(err, SolverError::Config(ConfigError::InvalidIterations));
    }
}
