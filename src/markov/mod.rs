//! Layered Absorbing-Markov Solver Module.
//!
//! This module solves turn-based stochastic games exactly, by treating them
//! as absorbing Markov chains and solving one linear system per level.
//!
//! # Overview
//!
//! A game is solvable here when its states split into *levels* (number of
//! players still in, coins still in play, ...) that never increase along a
//! move. Then:
//! 1. Levels are solved from the smallest upwards
//! 2. Each `(state, turn)` row gets one equation: its value equals the base
//!    term plus the probability-weighted values of its successors
//! 3. Successors at lower levels are already known and move to the right-hand
//!    side; only same-level successors remain as unknowns
//!
//! # Usage
//!
//! 1. Implement the `LeveledGame` trait for your game
//! 2. Create a `LayeredSolver` with your game and configuration
//! 3. Call `solve(level)`; missing lower levels are filled in first
//! 4. Read values with `value(state, turn)` or `player_values(state, turn)`
//!
//! # Example
//!
//! ```ignore
//! use markov_game_solver::games::dreidel::{Dreidel, DreidelConfig, DreidelState};
//! use markov_game_solver::markov::{LayeredSolver, Quantity, SolverConfig};
//!
//! let game = Dreidel::new(DreidelConfig::new(12, Quantity::WinProbability))?;
//! let mut solver = LayeredSolver::new(game, SolverConfig::default())?;
//!
//! // Four players, three coins each
//! solver.solve(4)?;
//! let start = DreidelState::opening(4, 3);
//! println!("{:?}", solver.player_values(&start, 0));
//! ```
//!
//! # Theory
//!
//! For a row with successors `s'` of probability `p(s')`:
//! ```text
//! V(s) = base(s) + sum p(s') * V(s')
//! ```
//! where `base` is 1 per counted turn for expected game length, and 0 for
//! win probability (terminal wins contribute 1 instead). Moving same-level
//! unknowns left gives `(I - P_same) V = b`, which is nonsingular because
//! every level's chain is absorbing.

pub mod config;
pub mod distribution;
pub mod game;
pub mod linear;
pub mod quantity;
pub mod solver;
pub mod storage;

// Re-export main types for convenient access
pub use config::{ConfigError, LevelStats, LinearMethod, SolveStats, SolverConfig};
pub use distribution::Distribution;
pub use game::{LeveledGame, Outcome, Position, RotationalSymmetry, Step, Successor, Transition};
pub use linear::{CsrMatrix, LinearError, LinearSolution, SparseSystem};
pub use quantity::Quantity;
pub use solver::{LayeredSolver, SolveError};
pub use storage::{LevelValues, ValueTable};
