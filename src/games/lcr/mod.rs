//! Left-Center-Right, the dice-redistribution game.
//!
//! ## Game Rules
//!
//! - Players sit in a circle, each starting with the same number of coins
//! - On a turn the player rolls one die per coin held, up to `max_dice`
//! - Each die shows **L** (pass a coin left), **C** (put a coin in the
//!   center, out of play for good), **R** (pass a coin right), or a dot
//!   (keep it); dots are on three faces out of six
//! - A player with no coins rolls nothing and the turn passes
//! - The game ends when the player to move holds every coin still in play
//!
//! ## Levels
//!
//! The level is the total coins in play. The center only ever takes coins,
//! so a roll stays on its level or drops to a lower one. Every level is the
//! set of weak compositions of the total into `num_players` parts.

pub mod config;
pub mod game;

pub use config::{LcrConfig, MAX_DICE};
pub use game::LeftCenterRight;
