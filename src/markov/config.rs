//! Configuration options for the layered solver.
//!
//! This module provides the solver configuration (linear method, tolerance,
//! iteration caps), the configuration error type shared with the game
//! adapters, and the statistics reported after each solved level.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which linear solver is used for each level's system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinearMethod {
    /// Restarted GMRES on the sparse system. Scales to millions of rows.
    #[default]
    Gmres,
    /// Dense Gaussian elimination with partial pivoting.
    ///
    /// Quadratic memory in the number of rows; intended for small levels and
    /// for cross-checking the iterative solver.
    Dense,
}

/// Configuration for the layered solver.
///
/// # Example
/// ```
/// use markov_game_solver::markov::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.tolerance, 1e-7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Relative residual target: a level is solved once
    /// `||b - Ax|| <= tolerance * ||b||`.
    pub tolerance: f64,

    /// GMRES restart length (Krylov basis size per cycle).
    pub restart: usize,

    /// Cap on total GMRES inner iterations per level.
    ///
    /// Hitting the cap without reaching `tolerance` is a hard error.
    pub max_iterations: usize,

    /// Linear solver used for every level.
    pub method: LinearMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-7,
            restart: 50,
            max_iterations: 10_000,
            method: LinearMethod::Gmres,
        }
    }
}

impl SolverConfig {
    /// Create a new SolverConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the relative residual tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method: set the GMRES restart length.
    pub fn with_restart(mut self, restart: usize) -> Self {
        self.restart = restart;
        self
    }

    /// Builder method: set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set the linear method.
    pub fn with_method(mut self, method: LinearMethod) -> Self {
        self.method = method;
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if self.restart == 0 {
            return Err(ConfigError::InvalidRestart);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations);
        }
        Ok(())
    }
}

/// Errors raised by malformed solver or game configuration.
///
/// These are always detected before any enumeration or matrix work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tolerance must lie strictly between 0 and 1.
    #[error("tolerance {0} is out of range (0, 1)")]
    InvalidTolerance(f64),
    /// GMRES restart length must be positive.
    #[error("restart length must be positive")]
    InvalidRestart,
    /// Iteration cap must be positive.
    #[error("max_iterations must be positive")]
    InvalidMaxIterations,
    /// Player count outside what the game supports.
    #[error("{players} players is out of range [{min}, {max}]")]
    InvalidPlayers {
        /// Requested player count.
        players: usize,
        /// Smallest supported count.
        min: usize,
        /// Largest supported count.
        max: usize,
    },
    /// A game with no coins in play.
    #[error("at least one coin must be in play")]
    NoCoins,
    /// A dice game that rolls no dice.
    #[error("max_dice must be positive")]
    NoDice,
    /// More dice per roll than outcome weights can count.
    #[error("{dice} dice per roll exceeds the limit of {max}")]
    TooManyDice {
        /// Requested dice per roll.
        dice: u32,
        /// Largest supported value.
        max: u32,
    },
    /// The start stake leaves some player already out of the game.
    #[error("{coins} coins per player is too few to start (need at least {min})")]
    StakeTooSmall {
        /// Requested coins per player.
        coins: u32,
        /// Minimum coins per player.
        min: u32,
    },
    /// Configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(String),
    /// Configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Statistics for one solved level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelStats {
    /// The level that was solved.
    pub level: usize,
    /// Number of states enumerated at this level.
    pub states: usize,
    /// Rows of the linear system (`states * players`).
    pub rows: usize,
    /// Stored nonzeros after duplicate entries were summed.
    pub nonzeros: usize,
    /// Linear solver iterations (0 for the dense method).
    pub iterations: usize,
    /// Final relative residual `||b - Ax|| / ||b||`.
    pub relative_residual: f64,
    /// Wall time spent on this level, in seconds.
    pub elapsed_seconds: f64,
}

/// Cumulative statistics across every level a solver has handled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveStats {
    /// Per-level statistics in the order levels were solved.
    pub levels: Vec<LevelStats>,
    /// Number of linear systems solved so far.
    pub linear_solves: u64,
    /// Total wall time across all levels, in seconds.
    pub elapsed_seconds: f64,
}

impl SolveStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly solved level.
    pub fn record(&mut self, level: LevelStats) {
        self.linear_solves += 1;
        self.elapsed_seconds += level.elapsed_seconds;
        self.levels.push(level);
    }

    /// Total number of states solved across all levels.
    pub fn total_states(&self) -> usize {
        self.levels.iter().map(|l| l.states).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.method, LinearMethod::Gmres);
        assert_eq!(config.restart, 50);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            SolverConfig::new().with_tolerance(0.0).validate(),
            Err(ConfigError::InvalidTolerance(0.0))
        );
        assert_eq!(
            SolverConfig::new().with_restart(0).validate(),
            Err(ConfigError::InvalidRestart)
        );
        assert_eq!(
            SolverConfig::new().with_max_iterations(0).validate(),
            Err(ConfigError::InvalidMaxIterations)
        );
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let config = SolverConfig::from_json_str(r#"{ "tolerance": 1e-9, "method": "dense" }"#)
            .unwrap();
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.method, LinearMethod::Dense);
        assert_eq!(config.max_iterations, 10_000);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let err = SolverConfig::from_json_str(r#"{ "restart": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidRestart);

        let err = SolverConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_stats_record() {
        let mut stats = SolveStats::new();
        stats.record(LevelStats { level: 2, states: 10, elapsed_seconds: 0.5, ..Default::default() });
        stats.record(LevelStats { level: 3, states: 20, elapsed_seconds: 0.25, ..Default::default() });
        assert_eq!(stats.linear_solves, 2);
        assert_eq!(stats.total_states(), 30);
        assert!((stats.elapsed_seconds - 0.75).abs() < 1e-12);
    }
}
