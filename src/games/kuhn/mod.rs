//! Kuhn Poker implementation for CFR validation.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR implementations
//! because it has a known, mathematically proven Nash equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack (1), Queen (2), King (3)
//! - 2 players, each antes 1 chip
//! - Each player receives 1 card
//! - Player 1 acts first: Pass or Bet (1 chip)
//! - Player 2 responds based on P1's action
//! - Higher card wins at showdown
//!
//! ## Game Tree
//!
//! ```text
//! P1 (first to act)
//! ├── Pass
//! │   └── P2
//! │       ├── Pass → Showdown (±1)
//! │       └── Bet
//! │           └── P1
//! │               ├── Pass → P2 wins 1
//! │               └── Bet → Showdown (±2)
//! └── Bet
//!     └── P2
//!         ├── Pass → P1 wins 1
//!         └── Bet → Showdown (±2)
//! ```
//!
//! ## Known Nash Equilibrium
//!
//! - **Player 1 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **Player 1 with King**: Bet with probability 3α
//! - **Player 2 facing Bet with Jack**: Always Fold
//! - **Player 2 facing Bet with King**: Always Call
//!
//! **Expected Value**: Player 1 EV = -1/18 ≈ -0.0556

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cfr::game::{history_string, Action, GameError, GameModel};

/// Game value for the first player at equilibrium.
pub const KUHN_GAME_VALUE: f64 = -1.0 / 18.0;

/// Actions in Kuhn Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnAction {
    /// Pass (check if no bet, fold if facing bet)
    Pass,
    /// Bet (or call if facing bet)
    Bet,
}

impl Action for KuhnAction {
    fn symbol(&self) -> String {
        match self {
            KuhnAction::Pass => "p".to_string(),
            KuhnAction::Bet => "b".to_string(),
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Pass => write!(f, "Pass"),
            KuhnAction::Bet => write!(f, "Bet"),
        }
    }
}

/// Kuhn Poker game.
///
/// Information set keys are the acting player's card followed by the action
/// history, e.g. `"1pb"`: holding the Jack after pass, bet.
#[derive(Debug, Clone, Copy, Default)]
pub struct KuhnPoker;

impl KuhnPoker {
    /// The deck, lowest card first.
    pub const CARDS: [u8; 3] = [1, 2, 3];

    /// Create a new Kuhn Poker game.
    pub fn new() -> Self {
        Self
    }
}

impl GameModel for KuhnPoker {
    type Action = KuhnAction;
    type Private = u8;

    fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> [u8; 2] {
        let mut cards = Self::CARDS;
        cards.shuffle(rng);
        [cards[0], cards[1]]
    }

    fn all_deals(&self) -> Vec<[u8; 2]> {
        let mut deals = Vec::with_capacity(6);
        for &first in &Self::CARDS {
            for &second in &Self::CARDS {
                if first != second {
                    deals.push([first, second]);
                }
            }
        }
        deals
    }

    fn terminal_payoff(
        &self,
        deal: &[u8; 2],
        history: &[KuhnAction],
    ) -> Result<Option<f64>, GameError> {
        use KuhnAction::{Bet, Pass};

        let plays = history.len();
        let player = plays % 2;
        let opponent = 1 - player;
        let player_higher = deal[player] > deal[opponent];

        let payoff = match history {
            [] | [_] | [Pass, Bet] => None,
            // Showdown after both pass
            [Pass, Pass] => Some(if player_higher { 1.0 } else { -1.0 }),
            // Pass facing a bet folds: the player to act is the bettor
            [Bet, Pass] | [Pass, Bet, Pass] => Some(1.0),
            // Bet and call, showdown
            [Bet, Bet] | [Pass, Bet, Bet] => Some(if player_higher { 2.0 } else { -2.0 }),
            _ => {
                return Err(GameError::UndefinedPayoff {
                    history: history_string(history),
                })
            }
        };

        Ok(payoff)
    }

    fn legal_actions(&self, _history: &[KuhnAction]) -> Vec<KuhnAction> {
        vec![KuhnAction::Pass, KuhnAction::Bet]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::{CFRSolver, SolverConfig};
    use super::KuhnAction::{Bet, Pass};

    fn trained(seed: u64, iterations: u64) -> CFRSolver<KuhnPoker> {
        let config = SolverConfig::default()
            .with_seed(seed)
            .with_trace_interval(None);
        let mut solver = CFRSolver::new(KuhnPoker::new(), config).unwrap();
        solver.train(iterations).unwrap();
        solver
    }

    #[test]
    fn test_kuhn_fold_wins_regardless_of_cards() {
        let game = KuhnPoker::new();

        for deal in game.all_deals() {
            // P1 bets, P2 folds: P1 (to act at "bp") wins 1
            assert_eq!(game.terminal_payoff(&deal, &[Bet, Pass]).unwrap(), Some(1.0));
            // P1 passes, P2 bets, P1 folds: P2 (to act at "pbp") wins 1
            assert_eq!(
                game.terminal_payoff(&deal, &[Pass, Bet, Pass]).unwrap(),
                Some(1.0)
            );
        }
    }

    #[test]
    fn test_kuhn_showdown_payoffs() {
        let game = KuhnPoker::new();

        // "pp" - both pass, higher card wins
        assert_eq!(game.terminal_payoff(&[3, 1], &[Pass, Pass]).unwrap(), Some(1.0));
        assert_eq!(game.terminal_payoff(&[1, 3], &[Pass, Pass]).unwrap(), Some(-1.0));

        // "bb" - bet then call, payoff for P1 (to act at length 2)
        assert_eq!(game.terminal_payoff(&[1, 3], &[Bet, Bet]).unwrap(), Some(-2.0));
        assert_eq!(game.terminal_payoff(&[2, 1], &[Bet, Bet]).unwrap(), Some(2.0));

        // "pbb" - payoff for P2 (to act at length 3)
        assert_eq!(game.terminal_payoff(&[2, 3], &[Pass, Bet, Bet]).unwrap(), Some(2.0));
        assert_eq!(game.terminal_payoff(&[3, 2], &[Pass, Bet, Bet]).unwrap(), Some(-2.0));
    }

    #[test]
    fn test_kuhn_non_terminal_histories() {
        let game = KuhnPoker::new();
        let deal = [1, 2];

        assert_eq!(game.terminal_payoff(&deal, &[]).unwrap(), None);
        assert_eq!(game.terminal_payoff(&deal, &[Pass]).unwrap(), None);
        assert_eq!(game.terminal_payoff(&deal, &[Bet]).unwrap(), None);
        assert_eq!(game.terminal_payoff(&deal, &[Pass, Bet]).unwrap(), None);

        let err = game
            .terminal_payoff(&deal, &[Pass, Bet, Bet, Pass])
            .unwrap_err();
        assert_eq!(
            err,
            GameError::UndefinedPayoff {
                history: "pbbp".to_string()
            }
        );
    }

    #[test]
    fn test_kuhn_info_keys_and_deals() {
        let game = KuhnPoker::new();
        assert_eq!(game.info_key(&3, &[Pass]), "3p");
        assert_eq!(game.info_key(&1, &[Pass, Bet]), "1pb");
        assert_eq!(game.info_key(&2, &[]), "2");

        let deals = game.all_deals();
        assert_eq!(deals.len(), 6);
        assert!(deals.iter().all(|d| d[0] != d[1]));

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let [a, b] = game.deal(&mut rng);
            assert_ne!(a, b);
            assert!(KuhnPoker::CARDS.contains(&a) && KuhnPoker::CARDS.contains(&b));
        }
    }

    #[test]
    fn test_kuhn_game_value_converges() {
        let solver = trained(1, 50_000);

        // 3 cards × {"", "p", "b", "pb"}
        assert_eq!(solver.num_info_sets(), 12);

        let value = solver.average_game_value();
        assert!(
            (value - KUHN_GAME_VALUE).abs() < 0.02,
            "average game value {} should be near -1/18",
            value
        );

        let profile = solver.profile_value().unwrap();
        assert!(
            (profile - KUHN_GAME_VALUE).abs() < 0.02,
            "average profile value {} should be near -1/18",
            profile
        );
    }

    #[test]
    fn test_kuhn_profile_value_at_10k_iterations() {
        let solver = trained(1, 10_000);

        // The exact value of the average profile over all six deals; the
        // running sampled average is noisier at this length.
        let profile = solver.profile_value().unwrap();
        assert!(
            (profile - KUHN_GAME_VALUE).abs() < 0.02,
            "average profile value {} should be near -1/18",
            profile
        );
    }

    #[test]
    fn test_kuhn_dominated_actions() {
        let solver = trained(1, 50_000);

        // Index 0 = Pass, Index 1 = Bet
        let jack_vs_bet = solver.average_strategy("1b").unwrap();
        assert!(jack_vs_bet[0] > 0.95, "Jack should fold to a bet: {:?}", jack_vs_bet);

        let king_vs_bet = solver.average_strategy("3b").unwrap();
        assert!(king_vs_bet[1] > 0.95, "King should call a bet: {:?}", king_vs_bet);

        let king_after_check = solver.average_strategy("3p").unwrap();
        assert!(king_after_check[1] > 0.95, "King should bet after a check: {:?}", king_after_check);

        let jack_root = solver.average_strategy("1").unwrap();
        assert!(jack_root[1] < 0.5, "Jack bluffs at most 1/3: {:?}", jack_root);
    }

    #[test]
    fn test_kuhn_strategies_are_distributions() {
        let solver = trained(7, 2_000);

        for (key, node) in solver.store().iter() {
            for strategy in [node.average_strategy(), node.current_strategy().to_vec()] {
                assert!(strategy.iter().all(|&p| p >= 0.0), "{}: {:?}", key, strategy);
                let sum: f64 = strategy.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{}: {:?}", key, strategy);
            }
        }
    }

    #[test]
    fn test_kuhn_same_seed_same_report() {
        let first = trained(42, 5_000).report();
        let second = trained(42, 5_000).report();

        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.lines.len(), 12);
        assert_eq!(first.lines[0].key, "1");
    }
}
