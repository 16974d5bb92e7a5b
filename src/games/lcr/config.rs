//! Left-Center-Right configuration.

use serde::{Deserialize, Serialize};

use crate::games::seats::MAX_SEATS;
use crate::markov::{ConfigError, Quantity};

/// Largest supported `max_dice`; `6^MAX_DICE` outcome weights fit in a `u64`.
pub const MAX_DICE: u32 = 24;

fn default_max_dice() -> u32 {
    3
}

/// Configuration of a Left-Center-Right game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LcrConfig {
    /// Number of players, fixed for the whole game.
    pub num_players: usize,

    /// What the solver computes.
    #[serde(default)]
    pub quantity: Quantity,

    /// Dice rolled per turn by a player with enough coins.
    #[serde(default = "default_max_dice")]
    pub max_dice: u32,
}

impl LcrConfig {
    /// Create a config with the standard three dice.
    pub fn new(num_players: usize, quantity: Quantity) -> Self {
        Self {
            num_players,
            quantity,
            max_dice: default_max_dice(),
        }
    }

    /// Builder method: set the number of dice per turn.
    pub fn with_max_dice(mut self, max_dice: u32) -> Self {
        self.max_dice = max_dice;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SEATS).contains(&self.num_players) {
            return Err(ConfigError::InvalidPlayers {
                players: self.num_players,
                min: 2,
                max: MAX_SEATS,
            });
        }
        if self.max_dice == 0 {
            return Err(ConfigError::NoDice);
        }
        if self.max_dice > MAX_DICE {
            return Err(ConfigError::TooManyDice {
                dice: self.max_dice,
                max: MAX_DICE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(LcrConfig::new(3, Quantity::ExpectedTurns).validate().is_ok());
        assert_eq!(
            LcrConfig::new(1, Quantity::ExpectedTurns).validate(),
            Err(ConfigError::InvalidPlayers { players: 1, min: 2, max: MAX_SEATS })
        );
        assert_eq!(
            LcrConfig::new(3, Quantity::ExpectedTurns).with_max_dice(0).validate(),
            Err(ConfigError::NoDice)
        );
        assert_eq!(
            LcrConfig::new(3, Quantity::ExpectedTurns).with_max_dice(25).validate(),
            Err(ConfigError::TooManyDice { dice: 25, max: MAX_DICE })
        );
    }

    #[test]
    fn test_json_defaults() {
        let config: LcrConfig = serde_json::from_str(r#"{"num_players": 4}"#).unwrap();
        assert_eq!(config.max_dice, 3);
        assert_eq!(config.quantity, Quantity::ExpectedTurns);
    }
}
