//! Chance-sampled Counterfactual Regret Minimization solver.
//!
//! Each iteration samples one chance outcome (a deal) and then walks the
//! whole game tree below it recursively:
//!
//! 1. Terminal histories return their payoff for the player to act
//! 2. Decision points derive a strategy by regret matching
//! 3. Every action is explored with the actor's reach probability scaled by
//!    the action's probability; child values are negated (zero-sum)
//! 4. Regrets are accumulated, weighted by the *opponent's* reach probability
//!
//! The solver is generic over any game that implements [`GameModel`].

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cfr::config::{CFRStats, ConfigError, SolverConfig};
use crate::cfr::error::SolverError;
use crate::cfr::game::{history_string, GameModel};
use crate::cfr::node::{expected_value, InfoSetNode};
use crate::cfr::report::{StrategyLine, StrategyReport};
use crate::cfr::storage::NodeStore;

/// Running average utility is logged every this many iterations.
const PROGRESS_LOG_INTERVAL: u64 = 1_000;

/// The recursive CFR solver.
///
/// This struct owns the game, the node store, and the single random source
/// through which every deal is sampled.
///
/// # Type Parameters
/// - `G`: The game type implementing the `GameModel` trait
///
/// # Example
/// ```
/// use cfr_practice::cfr::{CFRSolver, SolverConfig};
/// use cfr_practice::games::kuhn::KuhnPoker;
///
/// let config = SolverConfig::default().with_seed(1);
/// let mut solver = CFRSolver::new(KuhnPoker::new(), config).unwrap();
/// solver.train(1_000).unwrap();
///
/// let strategy = solver.average_strategy("1b").unwrap();
/// assert_eq!(strategy.len(), 2);
/// ```
pub struct CFRSolver<G: GameModel> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: SolverConfig,

    /// Information set nodes discovered so far.
    store: NodeStore,

    /// Current iteration count.
    iteration: u64,

    /// Statistics tracking.
    stats: CFRStats,

    /// Random number generator.
    rng: StdRng,
}

impl<G: GameModel> CFRSolver<G> {
    /// Create a new CFR solver for the given game.
    ///
    /// # Arguments
    /// * `game` - The game to solve
    /// * `config` - Configuration options for the solver
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(game: G, config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            game,
            config,
            store: NodeStore::new(),
            iteration: 0,
            stats: CFRStats::new(),
            rng,
        })
    }

    /// Run a single iteration: sample a deal and walk the tree below it.
    ///
    /// # Returns
    /// The root value of this iteration for the first player.
    pub fn run_iteration(&mut self) -> Result<f64, SolverError> {
        let deal = self.game.deal(&mut self.rng);
        let trace = self.config.traces(self.iteration);
        if trace {
            log::trace!("[iter: {}] deal: {:?}", self.iteration + 1, deal);
            log::trace!("history\tp0\tp1\tinfo_set\tstrategy\tpayoff\tregret");
        }

        let mut history = Vec::new();
        let util = self.cfr(&deal, &mut history, 1.0, 1.0, trace)?;

        self.iteration += 1;
        self.stats.total_utility += util;
        Ok(util)
    }

    /// Train the solver for a specified number of iterations.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run (must be positive)
    ///
    /// # Returns
    /// Statistics from the training run.
    pub fn train(&mut self, iterations: u64) -> Result<&CFRStats, SolverError> {
        self.train_with_callback(iterations, 0, |_| {})
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run (must be positive)
    /// * `callback_interval` - How often to call the callback (0 never calls it)
    /// * `callback` - Function called every `callback_interval` iterations
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
            "trained {} iterations, {} info sets, average game value {:.4}",
            self.stats.iterations,
            self.stats.info_sets,
            self.stats.average_game_value()
        );

        Ok(&self.stats)
    }

    fn refresh_stats(&mut self, elapsed_seconds: f64) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.store.len();
        self.stats.elapsed_seconds = elapsed_seconds;
        self.stats.update_rate();
    }

    /// Core recursive traversal.
    ///
    /// Returns the expected value of `history` for the player to act there,
    /// given reach probabilities `p0` and `p1` of the two players.
    fn cfr(
        &mut self,
        deal: &[G::Private; 2],
        history: &mut Vec<G::Action>,
        p0: f64,
        p1: f64,
        trace: bool,
    ) -> Result<f64, SolverError> {
        let player = history.len() % 2;

        if let Some(payoff) = self.game.terminal_payoff(deal, history)? {
            if trace {
                log::trace!("{}\t{}\t{}\t-\t-\t{}\t-", history_string(history), p0, p1, payoff);
            }
            return Ok(payoff);
        }

        let actions = self.game.legal_actions(history);
        let info_key = self.game.info_key(&deal[player], history);
        let (reach, opponent_reach) = if player == 0 { (p0, p1) } else { (p1, p0) };

        let strategy = self
            .store
            .get_or_create(&info_key, actions.len())?
            .get_strategy(reach)
            .to_vec();

        if trace {
            log::trace!(
                "{}\t{}\t{}\t{}\t{:?}\t-\t-",
                history_string(history),
                p0,
                p1,
                info_key,
                strategy
            );
        }

        let mut action_utils = vec![0.0; actions.len()];
        for (i, action) in actions.into_iter().enumerate() {
            history.push(action);
            let child = if player == 0 {
                self.cfr(deal, history, p0 * strategy[i], p1, trace)
            } else {
                self.cfr(deal, history, p0, p1 * strategy[i], trace)
            };
            history.pop();
            action_utils[i] = -child?;
        }

        let node_util = expected_value(&strategy, &action_utils);

        let node = self.store.get_or_create(&info_key, action_utils.len())?;
        node.accumulate_regret(&action_utils, node_util, opponent_reach);

        if trace {
            log::trace!(
                "{}\t{}\t{}\t{}\t{:?}\t{}\t{:?}",
                history_string(history),
                p0,
                p1,
                info_key,
                action_utils,
                node_util,
                node.regret_sum()
            );
        }

        Ok(node_util)
    }

    /// Exact expected value of the average-strategy profile for the first
    /// player, over every equally likely deal.
    ///
    /// Information sets that were never visited play uniformly.
    pub fn profile_value(&self) -> Result<f64, SolverError> {
        let deals = self.game.all_deals();
        if deals.is_empty() {
            return Ok(0.0);
        }

        let mut history = Vec::new();
        let mut total = 0.0;
        for deal in &deals {
            total += self.evaluate(deal, &mut history)?;
        }
        Ok(total / deals.len() as f64)
    }

    fn evaluate(
        &self,
        deal: &[G::Private; 2],
        history: &mut Vec<G::Action>,
    ) -> Result<f64, SolverError> {
        if let Some(payoff) = self.game.terminal_payoff(deal, history)? {
            return Ok(payoff);
        }

        let player = history.len() % 2;
        let actions = self.game.legal_actions(history);
        let info_key = self.game.info_key(&deal[player], history);

        let strategy = match self.store.get(&info_key) {
            Some(node) if node.num_actions() != actions.len() => {
                return Err(SolverError::ActionCountMismatch {
                    key: info_key,
                    expected: node.num_actions(),
                    actual: actions.len(),
                });
            }
            Some(node) => node.average_strategy(),
            None => InfoSetNode::new(&info_key, actions.len())?.average_strategy(),
        };

        let mut value = 0.0;
        for (i, action) in actions.into_iter().enumerate() {
            history.push(action);
            let child = self.evaluate(deal, history);
            history.pop();
            value -= strategy[i] * child?;
        }
        Ok(value)
    }

    /// Get the average strategy for an information set.
    ///
    /// This returns the time-averaged strategy which converges to Nash
    /// equilibrium, or `None` if the info set was never visited.
    pub fn average_strategy(&self, info_key: &str) -> Option<Vec<f64>> {
        self.store.get(info_key).map(InfoSetNode::average_strategy)
    }

    /// Look up the node of an information set.
    pub fn node(&self, info_key: &str) -> Option<&InfoSetNode> {
        self.store.get(info_key)
    }

    /// Average game value for the first player over all iterations run.
    pub fn average_game_value(&self) -> f64 {
        self.stats.total_utility / self.iteration.max(1) as f64
    }

    /// Average strategy of every information set, sorted by key, followed by
    /// the average game value.
    pub fn report(&self) -> StrategyReport {
        let lines = self
            .store
            .iter()
            .map(|(key, node)| StrategyLine {
                key: key.to_string(),
                strategy: node.average_strategy(),
            })
            .collect();

        StrategyReport::sorted(lines, self.config.report_precision)
            .with_game_value(self.average_game_value())
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered.
    pub fn num_info_sets(&self) -> usize {
        self.store.len()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the node store for analysis.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}
