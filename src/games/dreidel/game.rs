//! Dreidel transition model.

use std::fmt;

use crate::combinatorics::{composition_count, rank_weak_composition, unrank_weak_composition_into};
use crate::games::dreidel::config::DreidelConfig;
use crate::games::dreidel::state::DreidelState;
use crate::games::seats::{Seats, MAX_SEATS};
use crate::markov::{ConfigError, LeveledGame, Outcome, Position, Quantity, RotationalSymmetry, Step};

/// The four faces of the dreidel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    /// Nothing happens.
    Nun,
    /// The spinner takes the whole pot.
    Gimel,
    /// The spinner takes half the pot.
    Hei,
    /// The spinner puts one coin in.
    Shin,
}

impl Spin {
    /// Every face, each landing with probability 1/4.
    pub const ALL: [Spin; 4] = [Spin::Nun, Spin::Gimel, Spin::Hei, Spin::Shin];
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::Nun => write!(f, "Nun"),
            Spin::Gimel => write!(f, "Gimel"),
            Spin::Hei => write!(f, "Hei"),
            Spin::Shin => write!(f, "Shin"),
        }
    }
}

/// Dreidel as a leveled game.
///
/// Level `L` holds every state with `L` players still in. A state is stored
/// as `L + 1` slots (holdings, then the pot) summing to `num_coins`; the
/// pot always has at least one coin and each player at least `min_coins`.
#[derive(Debug, Clone)]
pub struct Dreidel {
    config: DreidelConfig,
}

impl Dreidel {
    /// Create a new dreidel game.
    pub fn new(config: DreidelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the game configuration.
    pub fn config(&self) -> &DreidelConfig {
        &self.config
    }

    /// Free coins at `level` once every player's minimum and the pot's
    /// guaranteed coin are set aside.
    fn free_coins(&self, level: usize) -> u32 {
        self.config.num_coins - 1 - level as u32 * self.config.min_coins()
    }

    /// Result of `spin` landing for the player at `turn`.
    pub fn spin(&self, state: &DreidelState, turn: usize, spin: Spin) -> Step<DreidelState> {
        let n = state.players();
        debug_assert!(turn < n);

        // Signed: a player who cannot pay briefly owes a coin.
        let mut holdings = [0i64; MAX_SEATS];
        for (slot, &h) in holdings.iter_mut().zip(state.holdings()) {
            *slot = i64::from(h);
        }
        let mut pot = i64::from(state.pot());

        match spin {
            Spin::Nun => {}
            Spin::Gimel => {
                holdings[turn] += pot;
                pot = 0;
            }
            Spin::Hei => {
                let win = i64::from(self.config.half_rounding.taken(state.pot()));
                holdings[turn] += win;
                pot -= win;
            }
            Spin::Shin => {
                holdings[turn] -= 1;
                pot += 1;
            }
        }

        if pot == 0 {
            // Everyone antes again
            for h in &mut holdings[..n] {
                *h -= 1;
            }
            pot = n as i64;
        }

        self.remove_losers(&holdings[..n], pot, turn)
    }

    /// Drop every player at the losing count and pass the turn on.
    ///
    /// Removed players' (possibly negative) holdings settle into the pot,
    /// and seats keep their cyclic order.
    fn remove_losers(&self, holdings: &[i64], mut pot: i64, turn: usize) -> Step<DreidelState> {
        let lose = i64::from(self.config.min_coins()) - 1;
        if self.config.quantity == Quantity::WinProbability && holdings[0] == lose {
            return Step::Terminal(Outcome::FocusLoses);
        }

        let mut survivors = [0u32; MAX_SEATS];
        let mut remaining = 0;
        let mut removed_through_turn = 0;
        for (i, &h) in holdings.iter().enumerate() {
            if h == lose {
                pot += lose;
                if i <= turn {
                    removed_through_turn += 1;
                }
            } else {
                survivors[remaining] = h as u32;
                remaining += 1;
            }
        }

        match remaining {
            0 => Step::Terminal(Outcome::FocusLoses),
            1 => Step::Terminal(Outcome::FocusWins),
            _ => {
                let next = (turn as i64 - removed_through_turn + 1).rem_euclid(remaining as i64);
                Step::Continue {
                    state: DreidelState::new(&survivors[..remaining], pot as u32),
                    turn: next as usize,
                }
            }
        }
    }
}

impl LeveledGame for Dreidel {
    type State = DreidelState;

    fn name(&self) -> &str {
        "dreidel"
    }

    fn quantity(&self) -> Quantity {
        self.config.quantity
    }

    fn level_bounds(&self) -> (usize, usize) {
        (1, self.config.max_players())
    }

    fn players_at(&self, level: usize) -> usize {
        level
    }

    fn num_states(&self, level: usize) -> usize {
        composition_count(level + 1, self.free_coins(level)) as usize
    }

    fn state_at(&self, level: usize, rank: usize) -> DreidelState {
        let min = self.config.min_coins();
        let mut seats = Seats::zeroed(level + 1);
        unrank_weak_composition_into(rank as u64, self.free_coins(level), seats.as_mut_slice());
        for h in &mut seats.as_mut_slice()[..level] {
            *h += min;
        }
        seats[level] += 1;
        DreidelState::from_seats(seats)
    }

    fn rank_of(&self, level: usize, state: &DreidelState) -> usize {
        assert_eq!(state.players(), level, "{} is not at level {}", state, level);
        assert_eq!(
            state.total(),
            self.config.num_coins,
            "{} does not hold the game's {} coins",
            state,
            self.config.num_coins
        );
        let min = self.config.min_coins();
        assert!(
            state.holdings().iter().all(|&h| h >= min),
            "{} has a player below the minimum of {} coins",
            state,
            min
        );
        assert!(state.pot() >= 1, "{} has an empty pot", state);
        let mut parts = *state.seats();
        for h in &mut parts.as_mut_slice()[..level] {
            *h -= min;
        }
        parts[level] -= 1;
        rank_weak_composition(parts.as_slice()) as usize
    }

    fn level_of(&self, state: &DreidelState) -> usize {
        state.players()
    }

    fn position(&self, state: &DreidelState, _turn: usize) -> Position {
        if state.players() <= 1 {
            Position::Terminal(Outcome::FocusWins)
        } else {
            Position::Live { counts_turn: true }
        }
    }

    fn outcomes(&self, state: &DreidelState, turn: usize) -> Vec<(Step<DreidelState>, u64)> {
        Spin::ALL.iter().map(|&spin| (self.spin(state, turn, spin), 1)).collect()
    }
}

impl RotationalSymmetry for Dreidel {
    fn rotate(&self, state: &DreidelState, player: usize) -> DreidelState {
        DreidelState::from_seats(state.seats().rotated_prefix(state.players(), player))
    }
}
