//! Error types shared by the solvers.

use std::fmt;

use crate::cfr::config::ConfigError;
use crate::cfr::game::GameError;

/// Errors that abort solver construction or training.
///
/// Numeric edge cases (all regrets non-positive, empty strategy sums) are
/// not errors: they fall back to a uniform strategy inside [`InfoSetNode`].
///
/// [`InfoSetNode`]: crate::cfr::node::InfoSetNode
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Invalid solver or game configuration.
    Config(ConfigError),
    /// The game model could not score or extend a history.
    Game(GameError),
    /// A decision point was declared with no legal actions.
    NoActions {
        /// Information set key of the offending node.
        key: String,
    },
    /// The same information set was reached with a different action count.
    ActionCountMismatch {
        /// Information set key of the offending node.
        key: String,
        /// Action count recorded when the node was created.
        expected: usize,
        /// Action count supplied by the later lookup.
        actual: usize,
    },
    /// An escalation model rolled a value outside `1..=sides`.
    InvalidRoll {
        /// The value returned by the model.
        roll: usize,
        /// Number of sides of the die.
        sides: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Config(err) => write!(f, "configuration error: {}", err),
            SolverError::Game(err) => write!(f, "game model error: {}", err),
            SolverError::NoActions { key } => {
                write!(f, "information set '{}' has no legal actions", key)
            }
            SolverError::ActionCountMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "information set '{}' created with {} actions but reached with {}",
                key, expected, actual
            ),
            SolverError::InvalidRoll { roll, sides } => {
                write!(f, "rolled {} on a {}-sided die", roll, sides)
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Config(err) => Some(err),
            SolverError::Game(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SolverError {
    fn from(err: ConfigError) -> Self {
        SolverError::Config(err)
    }
}

impl From<GameError> for SolverError {
    fn from(err: GameError) -> Self {
        SolverError::Game(err)
    }
}
