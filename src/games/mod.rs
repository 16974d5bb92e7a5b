//! Game implementations for the layered solver.
//!
//! Each game describes its state space level by level and the successor
//! distribution of every `(state, turn)`; the solver does the rest.
//!
//! ## Available Games
//!
//! - [`dreidel`]: the spinning-top game; players are eliminated, so the
//!   level is the number of players still in
//! - [`lcr`]: Left-Center-Right; coins leave play, so the level is the
//!   total stake
//!
//! ## Adding New Games
//!
//! To add a new game:
//!
//! 1. Create a new module under `src/games/`
//! 2. Define a state type and its rank bijection per level (the indexers in
//!    [`crate::combinatorics`] cover most coin-count states)
//! 3. Implement the `LeveledGame` trait, and `RotationalSymmetry` if every
//!    seat plays by the same rules
//! 4. Add tests that check enumeration and probability conservation
//!
//! See the [`lcr`] module for a compact example.

pub mod dreidel;
pub mod lcr;
pub mod seats;

pub use seats::{Seats, MAX_SEATS};
