//! Leveled game trait definition for the layered solver.
//!
//! Any game whose states can be partitioned into levels that never increase
//! along a transition can be solved exactly by implementing `LeveledGame`.
//! This provides a clean abstraction between the linear-algebra engine and
//! the rules of specific games.

use std::fmt::Debug;
use std::hash::Hash;

use crate::markov::distribution::Distribution;
use crate::markov::quantity::Quantity;

/// How a finished game went for the focus player (player 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Player 0 is the last one standing.
    FocusWins,
    /// Player 0 is out, or someone else took everything.
    FocusLoses,
}

/// One raw result of a move: either the game ends, or play continues from
/// `state` with `turn` to act.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step<S> {
    /// The move ends the game before any recorded state is reached.
    Terminal(Outcome),
    /// Play continues.
    Continue {
        /// Next state.
        state: S,
        /// Index of the player to act next.
        turn: usize,
    },
}

/// A step together with its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Successor<S> {
    /// Where the move leads.
    pub step: Step<S>,
    /// Probability of this step; sums to 1 over a live position's successors.
    pub probability: f64,
}

/// A successor classified relative to the level being solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<S> {
    /// Game over; contributes a fixed value to the right-hand side.
    Terminal(Outcome),
    /// Same level: an unknown of the current system (off-diagonal entry).
    SameLevel {
        /// Next state.
        state: S,
        /// Player to act next.
        turn: usize,
    },
    /// Strictly lower level: a known value from an already solved table.
    LowerLevel {
        /// Level of the next state.
        level: usize,
        /// Next state.
        state: S,
        /// Player to act next.
        turn: usize,
    },
}

/// What a `(state, turn)` row looks like before any move is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The game is already over at this exact state.
    Terminal(Outcome),
    /// The player to act moves.
    Live {
        /// Whether this turn adds to the turn count.
        counts_turn: bool,
    },
}

/// The main trait that defines the interface for any leveled game.
///
/// Implementors describe:
/// - how states at a level are enumerated (a dense rank bijection), and
/// - the distribution of successors of every `(state, turn)`.
///
/// The solver never builds a hash table of states: ranks from
/// [`rank_of`](LeveledGame::rank_of) are used directly as matrix indices.
///
/// # Invariants
/// - `state_at(level, r)` for `r in 0..num_states(level)` lists every state at
///   `level` exactly once, and `rank_of(level, &state_at(level, r)) == r`.
/// - Successors of a state at level `L` are terminal or at a level `<= L`.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl LeveledGame for MyGame {
///     type State = MyState;
///
///     // ... implement required methods
/// }
///
/// let mut solver = LayeredSolver::new(MyGame, SolverConfig::default())?;
/// solver.solve(target_level)?;
/// ```
pub trait LeveledGame {
    /// The type representing a game state (without the turn).
    type State: Clone + Eq + Hash + Debug;

    /// Human-readable name used in logs and reports.
    fn name(&self) -> &str;

    /// The quantity this configuration of the game computes.
    fn quantity(&self) -> Quantity;

    /// Smallest and largest admissible levels, inclusive.
    fn level_bounds(&self) -> (usize, usize);

    /// Number of players that can hold the turn at `level`.
    fn players_at(&self, level: usize) -> usize;

    /// Number of states at `level`.
    fn num_states(&self, level: usize) -> usize;

    /// The state with rank `rank` at `level`.
    ///
    /// # Panics
    /// Panics if `rank >= num_states(level)`.
    fn state_at(&self, level: usize, rank: usize) -> Self::State;

    /// Rank of `state` among the states at `level`.
    fn rank_of(&self, level: usize, state: &Self::State) -> usize;

    /// Level a state belongs to.
    fn level_of(&self, state: &Self::State) -> usize;

    /// Classify the row `(state, turn)` before any move is made.
    fn position(&self, state: &Self::State, turn: usize) -> Position;

    /// Raw outcomes of a move from a live position, with integer weights.
    ///
    /// Identical steps may appear several times; they are merged by
    /// [`successors`](LeveledGame::successors).
    fn outcomes(&self, state: &Self::State, turn: usize) -> Vec<(Step<Self::State>, u64)>;

    /// Successor distribution of a live position, duplicates merged.
    fn successors(&self, state: &Self::State, turn: usize) -> Vec<Successor<Self::State>> {
        Distribution::from_weighted(self.outcomes(state, turn)).into_successors()
    }

    /// Classify a step relative to `level`.
    ///
    /// # Panics
    /// Panics if the step would raise the level.
    fn classify(&self, level: usize, step: Step<Self::State>) -> Transition<Self::State> {
        match step {
            Step::Terminal(outcome) => Transition::Terminal(outcome),
            Step::Continue { state, turn } => {
                let next = self.level_of(&state);
                if next == level {
                    Transition::SameLevel { state, turn }
                } else if next < level {
                    Transition::LowerLevel { level: next, state, turn }
                } else {
                    panic!(
                        "{}: transition from level {} raised the level to {} ({:?})",
                        self.name(),
                        level,
                        next,
                        state
                    )
                }
            }
        }
    }
}

/// Games that look the same from every seat.
///
/// Relabelling player `p` as player 0 maps the game onto itself, so values
/// computed for player 0 give every other player's values too.
pub trait RotationalSymmetry: LeveledGame {
    /// Relabel seats so that player `player` becomes player 0, keeping the
    /// cyclic seating order.
    fn rotate(&self, state: &Self::State, player: usize) -> Self::State;
}
