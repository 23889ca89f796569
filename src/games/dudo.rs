//! One-die-versus-one-die Dudo.
//!
//! Each player rolls a single die in secret. Players alternate making claims
//! of the form "there are at least `count` dice showing `rank`" across both
//! dice, where a `1` is wild and counts toward every rank. Each claim must be
//! strictly stronger than the previous one. Instead of claiming, a player may
//! call "dudo" to doubt the last claim, which ends the game:
//!
//! - the claim stands if at least `count` dice show `rank` (or `1`), and the
//!   claimer wins 1
//! - otherwise the doubter wins 1
//!
//! ## Claim Order
//!
//! Claims are ranked by count first, then by rank with `1` (the wild face)
//! strongest: `1×2 < 1×3 < … < 1×sides < 1×1 < 2×2 < … < 2×sides < 2×1`.

use std::fmt;

use rand::Rng;

use crate::cfr::config::ConfigError;
use crate::cfr::game::{history_string, Action, GameError, GameModel};

/// Dice in play: one per player.
const NUM_DICE: u8 = 2;

/// Actions in Dudo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DudoAction {
    /// Claim at least `count` dice show `rank`.
    Claim {
        /// Number of dice claimed.
        count: u8,
        /// Face claimed (`1` is wild).
        rank: u8,
    },
    /// Doubt the previous claim.
    Dudo,
}

impl Action for DudoAction {
    fn symbol(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DudoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DudoAction::Claim { count, rank } => write!(f, "{}*{}", count, rank),
            DudoAction::Dudo => write!(f, "D"),
        }
    }
}

/// Dudo with one die per player.
///
/// Information set keys are `"<roll>|<action>,<action>,..."`, e.g.
/// `"4|1*3,1*6"`: holding a 4 after claims of one 3 and one 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dudo {
    sides: u8,
}

impl Default for Dudo {
    fn default() -> Self {
        Self { sides: 6 }
    }
}

impl Dudo {
    /// Create a game played with `sides`-sided dice.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidSides`] unless `2 <= sides <= 255`.
    pub fn new(sides: usize) -> Result<Self, ConfigError> {
        match u8::try_from(sides) {
            Ok(s) if s >= 2 => Ok(Self { sides: s }),
            _ => Err(ConfigError::InvalidSides(sides)),
        }
    }

    /// Number of sides of each die.
    pub fn sides(&self) -> usize {
        self.sides as usize
    }

    /// Number of distinct claims.
    pub fn num_claims(&self) -> usize {
        NUM_DICE as usize * self.sides()
    }

    /// Claim at position `index` in ascending strength order.
    pub fn claim_at(&self, index: usize) -> DudoAction {
        let sides = self.sides();
        let count = (index / sides) as u8 + 1;
        let position = index % sides;
        let rank = if position + 1 == sides {
            1
        } else {
            position as u8 + 2
        };
        DudoAction::Claim { count, rank }
    }

    /// Strength of a claim: its position in ascending claim order.
    ///
    /// Returns `None` for "dudo" and for claims outside this game.
    pub fn strength(&self, action: &DudoAction) -> Option<usize> {
        match *action {
            DudoAction::Claim { count, rank }
                if (1..=NUM_DICE).contains(&count) && (1..=self.sides).contains(&rank) =>
            {
                let position = if rank == 1 {
                    self.sides() - 1
                } else {
                    rank as usize - 2
                };
                Some((count as usize - 1) * self.sides() + position)
            }
            _ => None,
        }
    }

    /// Whether a claim is true for the given dice.
    pub fn claim_stands(&self, deal: &[u8; 2], count: u8, rank: u8) -> bool {
        let matching = deal.iter().filter(|&&d| d == rank || d == 1).count();
        matching >= count as usize
    }

    fn validate(&self, history: &[DudoAction]) -> Result<(), GameError> {
        let mut previous: Option<usize> = None;
        for action in history {
            let strength = self
                .strength(action)
                .filter(|&s| previous.map_or(true, |p| s > p))
                .ok_or_else(|| GameError::IllegalAction {
                    history: history_string(history),
                })?;
            previous = Some(strength);
        }
        Ok(())
    }
}

impl GameModel for Dudo {
    type Action = DudoAction;
    type Private = u8;

    fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> [u8; 2] {
        [rng.gen_range(1..=self.sides), rng.gen_range(1..=self.sides)]
    }

    fn all_deals(&self) -> Vec<[u8; 2]> {
        (1..=self.sides)
            .flat_map(|first| (1..=self.sides).map(move |second| [first, second]))
            .collect()
    }

    fn terminal_payoff(
        &self,
        deal: &[u8; 2],
        history: &[DudoAction],
    ) -> Result<Option<f64>, GameError> {
        let undefined = || GameError::UndefinedPayoff {
            history: history_string(history),
        };

        match history.iter().position(|a| *a == DudoAction::Dudo) {
            None => {
                self.validate(history)?;
                Ok(None)
            }
            // Doubting with no claim on the table, or playing on after a
            // doubt, has no defined outcome.
            Some(0) => Err(undefined()),
            Some(i) if i + 1 != history.len() => Err(undefined()),
            Some(i) => {
                self.validate(&history[..i])?;
                match history[i - 1] {
                    // The player to act now is the one who made the claim.
                    DudoAction::Claim { count, rank } => {
                        let stands = self.claim_stands(deal, count, rank);
                        Ok(Some(if stands { 1.0 } else { -1.0 }))
                    }
                    DudoAction::Dudo => Err(undefined()),
                }
            }
        }
    }

    fn legal_actions(&self, history: &[DudoAction]) -> Vec<DudoAction> {
        let first = match history.last().map(|action| self.strength(action)) {
            None => 0,
            Some(Some(strength)) => strength + 1,
            Some(None) => return Vec::new(),
        };

        let mut actions: Vec<DudoAction> =
            (first..self.num_claims()).map(|i| self.claim_at(i)).collect();
        if !history.is_empty() {
            actions.push(DudoAction::Dudo);
        }
        actions
    }

    fn info_key(&self, private: &u8, history: &[DudoAction]) -> String {
        let claims: Vec<String> = history.iter().map(Action::symbol).collect();
        format!("{}|{}", private, claims.join(","))
    }
}
