//! Dreidel, the coin-elimination game.
//!
//! ## Game Rules
//!
//! - Every player antes one coin into the pot, then players spin in turn
//! - Each spin lands on one of four faces with probability 1/4:
//!   - **Nun**: nothing happens
//!   - **Gimel**: the spinner takes the whole pot
//!   - **Hei**: the spinner takes half the pot (odd pots rounded per config)
//!   - **Shin**: the spinner puts one coin in
//! - When the pot runs empty, every player antes again
//! - A player who cannot pay (or, optionally, who reaches zero) is out
//! - The last player left wins
//!
//! ## Levels
//!
//! The level is the number of players still in. Eliminations only ever
//! lower it, and the coin total never changes, so every level is a finite
//! set of weak compositions:
//!
//! ```text
//! level L, N coins, m = min coins per player
//! slots:   h_0 - m, ..., h_{L-1} - m, pot - 1
//! sum:     N - 1 - L * m
//! states:  C(N - 1 - L * (m - 1), L)
//! ```
//!
//! A one-player level is the finished game.

pub mod config;
pub mod game;
pub mod state;

pub use config::{DreidelConfig, Elimination, HalfRounding};
pub use game::{Dreidel, Spin};
pub use state::DreidelState;
