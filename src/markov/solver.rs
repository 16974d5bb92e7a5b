//! Layered absorbing-Markov solver.
//!
//! This module implements the level-by-level solve:
//! - every `(state, turn)` row at a level is enumerated through the game's
//!   rank bijection, so row indices are `rank * players + turn`;
//! - successors are folded into the right-hand side (terminal and lower-level
//!   outcomes) or into off-diagonal coefficients (same-level outcomes);
//! - the resulting sparse system is solved and frozen into the value table.
//!
//! Levels are solved in increasing order, so every lower-level value a row
//! needs is already known when the row is built.

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::markov::config::{ConfigError, LevelStats, SolveStats, SolverConfig};
use crate::markov::game::{LeveledGame, Position, RotationalSymmetry, Transition};
use crate::markov::linear::{LinearError, SparseSystem};
use crate::markov::storage::ValueTable;

/// Errors that abort a solve.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Malformed solver or game configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Requested level is below the game's smallest level.
    #[error("level {level} is below the minimum admissible level {min}")]
    LevelBelowMinimum {
        /// Requested level.
        level: usize,
        /// Smallest admissible level.
        min: usize,
    },
    /// Requested level is above the game's largest level.
    #[error("level {level} is above the maximum admissible level {max}")]
    LevelAboveMaximum {
        /// Requested level.
        level: usize,
        /// Largest admissible level.
        max: usize,
    },
    /// The linear system of a level could not be solved to tolerance.
    #[error("linear solve failed at level {level}: {source}")]
    Linear {
        /// Level whose system failed.
        level: usize,
        /// Underlying solver failure.
        #[source]
        source: LinearError,
    },
}

/// The layered solver.
///
/// Owns the game, the configuration, and the value table. Values for a level
/// are written once, when that level's system is solved, and never change.
///
/// # Type Parameters
/// - `G`: The game type implementing the `LeveledGame` trait
///
/// # Example
/// ```ignore
/// use markov_game_solver::games::lcr::{LcrConfig, LeftCenterRight};
/// use markov_game_solver::markov::{LayeredSolver, Quantity, SolverConfig};
///
/// let game = LeftCenterRight::new(LcrConfig::new(3, Quantity::ExpectedTurns))?;
/// let mut solver = LayeredSolver::new(game, SolverConfig::default())?;
///
/// // Solves totals 1..=9 in order
/// solver.solve(9)?;
/// let expected_turns = solver.value(&start, 0);
/// ```
#[derive(Debug)]
pub struct LayeredSolver<G: LeveledGame> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: SolverConfig,

    /// Values of every solved level.
    table: ValueTable,

    /// Statistics tracking.
    stats: SolveStats,
}

impl<G: LeveledGame> LayeredSolver<G> {
    /// Create a new solver for the given game.
    ///
    /// # Errors
    /// Returns [`SolveError::Config`] if `config` fails validation.
    pub fn new(game: G, config: SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        Ok(Self {
            game,
            config,
            table: ValueTable::new(),
            stats: SolveStats::new(),
        })
    }

    /// Solve `level`, first solving every missing level below it.
    ///
    /// Solving a level that is already in the table does nothing.
    pub fn solve(&mut self, level: usize) -> Result<(), SolveError> {
        self.solve_with_callback(level, |_| {})
    }

    /// Solve with a callback invoked after each newly solved level.
    ///
    /// # Arguments
    /// * `level` - Target level
    /// * `callback` - Receives the statistics of every level solved by this call
    pub fn solve_with_callback<F>(&mut self, level: usize, mut callback: F) -> Result<(), SolveError>
    where
        F: FnMut(&LevelStats),
    {
        self.check_level(level)?;
        if self.table.is_solved(level) {
            return Ok(());
        }

        let (min, _) = self.game.level_bounds();
        let first = self.table.highest_solved().map_or(min, |h| h + 1);
        for current in first..=level {
            let stats = self.solve_level(current)?;
            callback(&stats);
            self.stats.record(stats);
        }
        Ok(())
    }

    /// Reject levels outside the game's bounds before any work is done.
    fn check_level(&self, level: usize) -> Result<(), SolveError> {
        let (min, max) = self.game.level_bounds();
        if level < min {
            return Err(SolveError::LevelBelowMinimum { level, min });
        }
        if level > max {
            return Err(SolveError::LevelAboveMaximum { level, max });
        }
        Ok(())
    }

    /// Build and solve the system of one level whose lower levels are done.
    fn solve_level(&mut self, level: usize) -> Result<LevelStats, SolveError> {
        let start_time = Instant::now();
        let quantity = self.game.quantity();
        let players = self.game.players_at(level);
        let num_states = self.game.num_states(level);
        let dim = num_states * players;

        let mut system = SparseSystem::with_capacity(dim, dim * 4);
        for rank in 0..num_states {
            let state = self.game.state_at(level, rank);
            for turn in 0..players {
                let row = rank * players + turn;
                system.add(row, row, 1.0);

                let rhs = match self.game.position(&state, turn) {
                    Position::Terminal(outcome) => quantity.terminal_value(outcome),
                    Position::Live { counts_turn } => {
                        let mut rhs = quantity.base_term(counts_turn);
                        for successor in self.game.successors(&state, turn) {
                            let p = successor.probability;
                            match self.game.classify(level, successor.step) {
                                Transition::Terminal(outcome) => {
                                    rhs += p * quantity.terminal_value(outcome);
                                }
                                Transition::LowerLevel { level: lower, state: next, turn: next_turn } => {
                                    rhs += p * self.lower_value(lower, &next, next_turn);
                                }
                                Transition::SameLevel { state: next, turn: next_turn } => {
                                    let col = self.game.rank_of(level, &next) * players + next_turn;
                                    system.add(row, col, -p);
                                }
                            }
                        }
                        rhs
                    }
                };
                system.set_rhs(row, rhs);
            }
        }

        let solution = system.solve(&self.config).map_err(|source| {
            warn!(game = self.game.name(), level, error = %source, "level solve failed");
            SolveError::Linear { level, source }
        })?;

        let stats = LevelStats {
            level,
            states: num_states,
            rows: dim,
            nonzeros: solution.nonzeros,
            iterations: solution.iterations,
            relative_residual: solution.relative_residual,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        };
        info!(
            game = self.game.name(),
            level,
            states = stats.states,
            rows = stats.rows,
            nonzeros = stats.nonzeros,
            iterations = stats.iterations,
            residual = stats.relative_residual,
            seconds = stats.elapsed_seconds,
            "solved level"
        );

        self.table.insert(level, players, solution.x);
        Ok(stats)
    }

    /// Value of a state at an already solved lower level.
    fn lower_value(&self, level: usize, state: &G::State, turn: usize) -> f64 {
        let rank = self.game.rank_of(level, state);
        self.table.get(level, rank, turn).unwrap_or_else(|| {
            panic!(
                "{}: level {} needed before it was solved ({:?}, turn {})",
                self.game.name(),
                level,
                state,
                turn
            )
        })
    }

    /// Value of `(state, turn)`, or `None` if its level is not solved or the
    /// turn does not exist at that level.
    pub fn get_value(&self, state: &G::State, turn: usize) -> Option<f64> {
        let level = self.game.level_of(state);
        let values = self.table.level(level)?;
        if turn >= values.players() {
            return None;
        }
        let rank = self.game.rank_of(level, state);
        values.get(rank, turn)
    }

    /// Value of `(state, turn)`.
    ///
    /// # Panics
    /// Panics if the state's level has not been solved.
    pub fn value(&self, state: &G::State, turn: usize) -> f64 {
        self.get_value(state, turn).unwrap_or_else(|| {
            panic!(
                "{}: no value for {:?}, turn {} (level {} solved: {})",
                self.game.name(),
                state,
                turn,
                self.game.level_of(state),
                self.table.is_solved(self.game.level_of(state))
            )
        })
    }

    /// Highest level solved so far.
    pub fn highest_solved(&self) -> Option<usize> {
        self.table.highest_solved()
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Get reference to the value table.
    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Get current statistics.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}

impl<G: RotationalSymmetry> LayeredSolver<G> {
    /// Values of `(state, turn)` from every player's perspective.
    ///
    /// Entry `p` is the value computed with player `p` relabelled as player 0;
    /// in win-probability mode it is the probability that player `p` wins.
    ///
    /// # Panics
    /// Panics if the state's level has not been solved.
    pub fn player_values(&self, state: &G::State, turn: usize) -> Vec<f64> {
        let players = self.game.players_at(self.game.level_of(state));
        (0..players)
            .map(|p| {
                let rotated = self.game.rotate(state, p);
                self.value(&rotated, (turn + players - p) % players)
            })
            .collect()
    }
}
