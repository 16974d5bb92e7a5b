//! # Markov Game Solver
//!
//! Exact expected game lengths and win probabilities for turn-based games of
//! chance, computed by solving the game's absorbing Markov chain level by
//! level.
//!
//! ## Features
//!
//! - **Generic Layered Solver**: Works with any game implementing the `LeveledGame` trait
//! - **Table-Free Indexing**: States map to matrix rows through colex ranks of
//!   weak compositions, with no hash table of states
//! - **Sparse Linear Algebra**: Restarted GMRES on CSR matrices, with a dense
//!   direct solver for small levels and cross-checks
//! - **Both Quantities**: Expected number of turns, or the focus player's win probability
//! - **Sweeps**: Text and JSON reports over ranges of player counts and stakes
//!
//! ## Quick Start
//!
//! ```ignore
//! use markov_game_solver::games::lcr::{LcrConfig, LeftCenterRight};
//! use markov_game_solver::markov::{LayeredSolver, Quantity, SolverConfig};
//!
//! // 1. Pick a game and the quantity to compute
//! let game = LeftCenterRight::new(LcrConfig::new(3, Quantity::WinProbability))?;
//!
//! // 2. Create a solver
//! let mut solver = LayeredSolver::new(game, SolverConfig::default())?;
//!
//! // 3. Solve up to the starting level (total coins in play)
//! solver.solve(9)?;
//!
//! // 4. Read values
//! let start = solver.game().opening(3);
//! let win_probabilities = solver.player_values(&start, 0);
//! ```
//!
//! ## Modules
//!
//! - [`combinatorics`]: Rank/unrank bijections for subsets and weak compositions
//! - [`markov`]: Core layered solver
//! - [`games`]: Dreidel and Left-Center-Right
//! - [`report`]: Start-state reports and sweep export
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Layered Solver (Generic)                       │
//! │  - Level ordering         - Sparse system assembly              │
//! │  - GMRES / dense solve    - Write-once value table              │
//! └─────────────────────────────────────────────────────────────────┘
//!                  │                               │
//!                  │ implements LeveledGame        │ ranks states
//!                  ▼                               ▼
//!         ┌─────────┴─────────┐            ┌───────────────┐
//!         ▼                   ▼            │ Combinatorics │
//!    ┌─────────┐       ┌─────────────┐     └───────────────┘
//!    │ Dreidel │       │     LCR     │
//!    └─────────┘       └─────────────┘
//! ```

#![warn(missing_docs)]

/// Combinatorial indexing of game states.
pub mod combinatorics;

/// Layered absorbing-Markov solver module.
///
/// This is the core module containing the generic solver.
pub mod markov;

/// Game implementations.
pub mod games;

/// Start-state reports and sweep export.
pub mod report;

// Re-export commonly used types at crate root
pub use markov::{LayeredSolver, LeveledGame, Quantity, SolveError, SolverConfig};
