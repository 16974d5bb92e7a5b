//! Dreidel rule configuration.

use serde::{Deserialize, Serialize};

use crate::games::seats::MAX_SEATS;
use crate::markov::{ConfigError, Quantity};

/// Who gets the odd coin when Hei splits an odd pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HalfRounding {
    /// The spinner takes the smaller half.
    Down,
    /// The spinner takes the larger half.
    #[default]
    Up,
}

impl HalfRounding {
    /// Coins the spinner takes from a pot of `pot`.
    #[inline]
    pub fn taken(self, pot: u32) -> u32 {
        match self {
            HalfRounding::Down => pot / 2,
            HalfRounding::Up => (pot + 1) / 2,
        }
    }
}

/// When a player is out of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Elimination {
    /// Out when asked to pay with no coins left.
    #[default]
    CannotPay,
    /// Out as soon as the last coin is gone.
    Broke,
}

impl Elimination {
    /// Fewest coins a player still in the game can hold.
    #[inline]
    pub fn min_coins(self) -> u32 {
        match self {
            Elimination::CannotPay => 0,
            Elimination::Broke => 1,
        }
    }
}

/// Configuration of a dreidel game.
///
/// The total number of coins is fixed for the whole game; the number of
/// players still in is the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreidelConfig {
    /// Coins in play, pot included.
    pub num_coins: u32,

    /// What the solver computes.
    #[serde(default)]
    pub quantity: Quantity,

    /// Rounding of the Hei split.
    #[serde(default)]
    pub half_rounding: HalfRounding,

    /// Elimination rule.
    #[serde(default)]
    pub elimination: Elimination,
}

impl DreidelConfig {
    /// Create a config with default rules.
    pub fn new(num_coins: u32, quantity: Quantity) -> Self {
        Self {
            num_coins,
            quantity,
            half_rounding: HalfRounding::default(),
            elimination: Elimination::default(),
        }
    }

    /// Builder method: set the Hei rounding.
    pub fn with_half_rounding(mut self, half_rounding: HalfRounding) -> Self {
        self.half_rounding = half_rounding;
        self
    }

    /// Builder method: set the elimination rule.
    pub fn with_elimination(mut self, elimination: Elimination) -> Self {
        self.elimination = elimination;
        self
    }

    /// Fewest coins a player still in the game can hold.
    pub fn min_coins(&self) -> u32 {
        self.elimination.min_coins()
    }

    /// Largest number of players the coins can support.
    ///
    /// Every player needs `min_coins` and the pot needs one coin per player
    /// after the opening ante.
    pub fn max_players(&self) -> usize {
        let by_coins = (self.num_coins / (self.min_coins() + 1)) as usize;
        by_coins.min(MAX_SEATS - 1)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_coins == 0 {
            return Err(ConfigError::NoCoins);
        }
        let need = self.min_coins() + 1;
        if self.num_coins < need {
            return Err(ConfigError::StakeTooSmall {
                coins: self.num_coins,
                min: need,
            });
        }
        Ok(())
    }
}
