//! Liar Die.
//!
//! Players take turns rolling a single die in secret and claiming a value
//! strictly higher than the previous claim. The player facing a claim either
//! doubts it, ending the game, or accepts it, after which they roll the die
//! themselves and must claim higher. A doubt wins 1 if the claim exceeds the
//! die the claimer actually rolled, and loses 1 otherwise. A claim of the
//! maximum face can only be doubted.
//!
//! The game is solved with [`SweepSolver`](crate::cfr::SweepSolver).

use crate::cfr::config::ConfigError;
use crate::cfr::game::EscalationModel;

/// Liar Die played with a `sides`-sided die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiarDie {
    sides: usize,
}

impl Default for LiarDie {
    fn default() -> Self {
        Self { sides: 6 }
    }
}

impl LiarDie {
    /// Create a game with a `sides`-sided die.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidSides`] if `sides < 2`.
    pub fn new(sides: usize) -> Result<Self, ConfigError> {
        if sides < 2 {
            return Err(ConfigError::InvalidSides(sides));
        }
        Ok(Self { sides })
    }
}

impl EscalationModel for LiarDie {
    fn sides(&self) -> usize {
        self.sides
    }

    fn doubt_payoff(&self, claim: usize, roll: usize) -> f64 {
        if claim > roll {
            1.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sides_validation() {
        assert_eq!(LiarDie::new(1), Err(ConfigError::InvalidSides(1)));
        assert_eq!(LiarDie::new(6), Ok(LiarDie::default()));
        assert_eq!(LiarDie::new(2).unwrap().sides(), 2);
    }

    #[test]
    fn test_doubt_payoff() {
        let game = LiarDie::default();
        // Doubting an overclaim wins.
        assert_eq!(game.doubt_payoff(5, 3), 1.0);
        // A truthful claim, or an underclaim, beats the doubter.
        assert_eq!(game.doubt_payoff(3, 3), -1.0);
        assert_eq!(game.doubt_payoff(2, 6), -1.0);
    }

    #[test]
    fn test_rolls_in_range() {
        let game = LiarDie::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let roll = game.roll(&mut rng);
            assert!((1..=4).contains(&roll));
            seen[roll - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
