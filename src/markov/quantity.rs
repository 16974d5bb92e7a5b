//! The quantity a solver computes.
//!
//! The solver itself is quantity-agnostic: everything that differs between
//! "expected number of turns" and "probability the focus player wins" is the
//! right-hand-side base term of each row and the value of terminal outcomes.

use serde::{Deserialize, Serialize};

use crate::markov::game::Outcome;

/// Which steady-state quantity to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Expected number of remaining turns until the game ends.
    #[default]
    ExpectedTurns,
    /// Probability that player 0 (the focus player) wins.
    WinProbability,
}

impl Quantity {
    /// Right-hand-side base term of a live row.
    ///
    /// `counts_turn` is false for turns that pass without a move (a player
    /// with nothing to roll), which do not add to the turn count.
    #[inline]
    pub fn base_term(self, counts_turn: bool) -> f64 {
        match self {
            Quantity::ExpectedTurns if counts_turn => 1.0,
            Quantity::ExpectedTurns | Quantity::WinProbability => 0.0,
        }
    }

    /// Fixed value of a game-over outcome.
    #[inline]
    pub fn terminal_value(self, outcome: Outcome) -> f64 {
        match (self, outcome) {
            (Quantity::ExpectedTurns, _) => 0.0,
            (Quantity::WinProbability, Outcome::FocusWins) => 1.0,
            (Quantity::WinProbability, Outcome::FocusLoses) => 0.0,
        }
    }

    /// Short label used in reports and logs.
    pub fn label(self) -> &'static str {
        match self {
            Quantity::ExpectedTurns => "E(# turns)",
            Quantity::WinProbability => "P(player 0 wins)",
        }
    }
}
