//! Game implementations for the CFR solvers.
//!
//! These serve as:
//!
//! 1. **Validation**: Games with known Nash equilibria (like Kuhn Poker) verify
//!    that the CFR implementation is correct.
//!
//! 2. **Examples**: Demonstrate how to implement `GameModel` and
//!    `EscalationModel` for new games.
//!
//! 3. **Benchmarks**: Provide standardized games for performance testing.
//!
//! ## Available Games
//!
//! - [`kuhn`]: Kuhn Poker - A simplified 3-card poker game with known Nash equilibrium
//! - [`dudo`]: One-die-versus-one-die Dudo with wild ones
//! - [`liars_die`]: Liar Die, solved by the sweep solver
//!
//! ## Adding New Games
//!
//! 1. Create a new module under `src/games/`
//! 2. Define the action type and implement `Action` for it
//! 3. Implement `GameModel` (or `EscalationModel` for claim/response grids)
//! 4. Add tests that verify expected behavior
//!
//! See the [`kuhn`] module for a complete example.

pub mod dudo;
pub mod kuhn;
pub mod liars_die;
