//! # CFR Practice
//!
//! Counterfactual Regret Minimization (CFR) solvers for small
//! imperfect-information games.
//!
//! ## Features
//!
//! - **Recursive CFR**: chance-sampled CFR over any game implementing
//!   `GameModel`, with lazily created information sets
//! - **FSICFR**: forward/backward sweeps over a fixed grid of decision points
//!   for claim-escalation games
//! - **Reproducible**: one seeded random source per solver
//! - **Reports**: average strategies as text or JSON
//!
//! ## Quick Start
//!
//! ```
//! use cfr_practice::{CFRSolver, SolverConfig};
//! use cfr_practice::games::kuhn::KuhnPoker;
//!
//! let mut solver = CFRSolver::new(KuhnPoker::new(), SolverConfig::default()).unwrap();
//! solver.train(1_000).unwrap();
//! println!("{}", solver.report());
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Core CFR algorithms and solvers
//! - [`games`]: Game implementations (Kuhn Poker, Dudo, Liar Die)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │     CFRSolver (recursive)    │   │     SweepSolver (FSICFR)     │
//! │  NodeStore of InfoSetNodes   │   │  claim/response node grids   │
//! └──────────────────────────────┘   └──────────────────────────────┘
//!               │ GameModel                         │ EscalationModel
//!         ┌─────┴─────┐                             │
//!         ▼           ▼                             ▼
//!    ┌─────────┐ ┌─────────┐                  ┌───────────┐
//!    │  Kuhn   │ │  Dudo   │                  │ Liar Die  │
//!    │  Poker  │ │ 1 vs 1  │                  │           │
//!    └─────────┘ └─────────┘                  └───────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// This is the core module containing both solvers and the node types they
/// share.
pub mod cfr;

/// Game implementations module.
///
/// Contains the games solved by the CFR solvers.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{
    CFRSolver, CFRStats, EscalationModel, GameModel, SolverConfig, SolverError, StrategyReport,
    SweepSolver,
};
