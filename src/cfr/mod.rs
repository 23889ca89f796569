//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module provides the regret-matching machinery shared by two solvers
//! for two-player zero-sum games with imperfect information.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! # Solvers
//!
//! - **[`CFRSolver`]**: chance-sampled recursive CFR over any [`GameModel`];
//!   nodes are created lazily in a [`NodeStore`]
//! - **[`SweepSolver`]**: Fixed-Strategy Iteration CFR over an
//!   [`EscalationModel`]; nodes live in dense grids visited by a forward and
//!   a backward pass each iteration
//!
//! # Example
//!
//! ```
//! use cfr_practice::cfr::{CFRSolver, SolverConfig};
//! use cfr_practice::games::kuhn::KuhnPoker;
//!
//! let config = SolverConfig::default().with_seed(7);
//! let mut solver = CFRSolver::new(KuhnPoker::new(), config).unwrap();
//!
//! let stats = solver.train(10_000).unwrap();
//! println!("Trained {} info sets in {:.2}s", stats.info_sets, stats.elapsed_seconds);
//!
//! let strategy = solver.average_strategy("1b").unwrap();
//! println!("Jack facing a bet: {:?}", strategy);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of the current strategy.
//! ```text
//! Regret(a) = Value(a) - Value(current_strategy)
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! **Convergence**: Average regret decreases as O(1/sqrt(T)), and the average strategy
//! converges to Nash equilibrium.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Neller, T., Lanctot, M. "An Introduction to Counterfactual Regret Minimization" (2013)

pub mod config;
pub mod error;
pub mod game;
pub mod node;
pub mod report;
pub mod solver;
pub mod storage;
pub mod sweep;

// Re-export main types for convenient access
pub use config::{CFRStats, ConfigError, SolverConfig};
pub use error::SolverError;
pub use game::{history_string, Action, EscalationModel, GameError, GameModel};
pub use node::InfoSetNode;
pub use report::{StrategyLine, StrategyReport};
pub use solver::CFRSolver;
pub use storage::NodeStore;
pub use sweep::SweepSolver;
