//! Game model traits for the CFR solvers.
//!
//! The solvers own the regret-matching machinery; a game model supplies the
//! rules. [`GameModel`] describes alternating two-player games walked by the
//! recursive solver. [`EscalationModel`] describes the claim/response grid
//! swept by the FSICFR solver.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use rand::Rng;

/// Trait for actions that can be taken in a game.
///
/// Actions must be cloneable, comparable, and hashable.
pub trait Action: Clone + Eq + Hash + Debug {
    /// Textual symbol of the action, used to build information set keys.
    fn symbol(&self) -> String;
}

/// Render a history as the concatenation of its action symbols.
pub fn history_string<A: Action>(history: &[A]) -> String {
    history.iter().map(Action::symbol).collect()
}

/// Rules of an alternating, two-player, zero-sum game.
///
/// The state of a game is fully described by each player's private value
/// (a card, a die roll) plus the public action history. The player to act is
/// always `history.len() % 2`.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl GameModel for MyGame {
///     type Action = MyAction;
///     type Private = u8;
///
///     // ... implement required methods
/// }
/// ```
pub trait GameModel {
    /// The type representing an action a player can take.
    type Action: Action;

    /// A player's private information.
    type Private: Copy + Eq + Debug + Display;

    /// Sample one chance outcome: the private values of both players.
    fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> [Self::Private; 2];

    /// Every chance outcome, each equally likely.
    ///
    /// Used for exact evaluation of a strategy profile.
    fn all_deals(&self) -> Vec<[Self::Private; 2]>;

    /// Payoff for the player to act at `history`, if the history is terminal.
    ///
    /// # Returns
    /// - `Ok(Some(payoff))` for a terminal history. Positive values favor the
    ///   player whose turn it would be (`history.len() % 2`). A payoff of
    ///   `0.0` is a legitimate terminal value.
    /// - `Ok(None)` if play continues.
    ///
    /// # Errors
    /// [`GameError::UndefinedPayoff`] if the rules cannot score the history.
    fn terminal_payoff(
        &self,
        deal: &[Self::Private; 2],
        history: &[Self::Action],
    ) -> Result<Option<f64>, GameError>;

    /// Legal actions at a non-terminal history, in a fixed order.
    fn legal_actions(&self, history: &[Self::Action]) -> Vec<Self::Action>;

    /// Information set key: private value followed by the public history.
    fn info_key(&self, private: &Self::Private, history: &[Self::Action]) -> String {
        format!("{}{}", private, history_string(history))
    }
}

/// Rules of a claim-escalation game played on a single die.
///
/// Claims are integers in `1..=sides`; each claim must exceed the previous
/// one, and the responder either doubts or accepts it. Accepting means
/// rolling again and making a higher claim.
pub trait EscalationModel {
    /// Number of sides of the die.
    fn sides(&self) -> usize;

    /// Payoff to the responder for doubting `claim` when the claimer's die
    /// shows `roll`.
    fn doubt_payoff(&self, claim: usize, roll: usize) -> f64;

    /// Roll the die: uniform over `1..=sides`.
    ///
    /// Overrides must stay within `1..=sides`; the sweep solver rejects any
    /// other value with [`SolverError::InvalidRoll`].
    ///
    /// [`SolverError::InvalidRoll`]: crate::cfr::error::SolverError::InvalidRoll
    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(1..=self.sides())
    }
}

/// Errors raised by a game model.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The rules do not define a payoff for this history.
    UndefinedPayoff {
        /// Textual history that could not be scored.
        history: String,
    },
    /// An action is not legal at the history it was applied to.
    IllegalAction {
        /// Textual history ending in the illegal action.
        history: String,
    },
}

impl Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UndefinedPayoff { history } => {
                write!(f, "no payoff rule for history '{}'", history)
            }
            GameError::IllegalAction { history } => {
                write!(f, "illegal action in history '{}'", history)
            }
        }
    }
}

impl std::error::Error for GameError {}
