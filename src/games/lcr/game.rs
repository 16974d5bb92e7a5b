//! Left-Center-Right transition model.

use crate::combinatorics::{binomial, composition_count, rank_weak_composition, unrank_weak_composition_into};
use crate::games::lcr::config::LcrConfig;
use crate::games::seats::Seats;
use crate::markov::{ConfigError, LeveledGame, Outcome, Position, Quantity, RotationalSymmetry, Step};

/// Faces of an LCR die out of six: L, C, R once each, three dots.
const DOT_FACES: u64 = 3;

/// Left-Center-Right as a leveled game.
///
/// Level `T` holds every way `T` coins can be spread over the players; coins
/// only leave play through the center, so the total never grows.
#[derive(Debug, Clone)]
pub struct LeftCenterRight {
    config: LcrConfig,
}

impl LeftCenterRight {
    /// Create a new game.
    pub fn new(config: LcrConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the game configuration.
    pub fn config(&self) -> &LcrConfig {
        &self.config
    }

    /// Number of players.
    pub fn num_players(&self) -> usize {
        self.config.num_players
    }

    /// Every player holding `coins`.
    pub fn opening(&self, coins: u32) -> Seats {
        Seats::from_slice(&vec![coins; self.config.num_players])
    }

    /// Outcome for player 0 when the player at `turn` holds everything.
    fn winner(turn: usize) -> Outcome {
        if turn == 0 {
            Outcome::FocusWins
        } else {
            Outcome::FocusLoses
        }
    }
}

impl LeveledGame for LeftCenterRight {
    type State = Seats;

    fn name(&self) -> &str {
        "left-center-right"
    }

    fn quantity(&self) -> Quantity {
        self.config.quantity
    }

    fn level_bounds(&self) -> (usize, usize) {
        (1, u32::MAX as usize)
    }

    fn players_at(&self, _level: usize) -> usize {
        self.config.num_players
    }

    fn num_states(&self, level: usize) -> usize {
        composition_count(self.config.num_players, level as u32) as usize
    }

    fn state_at(&self, level: usize, rank: usize) -> Seats {
        let mut coins = Seats::zeroed(self.config.num_players);
        unrank_weak_composition_into(rank as u64, level as u32, coins.as_mut_slice());
        coins
    }

    fn rank_of(&self, level: usize, state: &Seats) -> usize {
        assert_eq!(state.total() as usize, level, "{} does not hold {} coins", state, level);
        assert_eq!(
            state.len(),
            self.config.num_players,
            "{} is not seated for {} players",
            state,
            self.config.num_players
        );
        rank_weak_composition(state.as_slice()) as usize
    }

    fn level_of(&self, state: &Seats) -> usize {
        state.total() as usize
    }

    fn position(&self, state: &Seats, turn: usize) -> Position {
        if state[turn] == state.total() {
            Position::Terminal(Self::winner(turn))
        } else {
            Position::Live {
                counts_turn: state[turn] != 0,
            }
        }
    }

    /// Rolls grouped by how many dice show L, C and R; the rest are dots.
    fn outcomes(&self, state: &Seats, turn: usize) -> Vec<(Step<Seats>, u64)> {
        let n = self.config.num_players;
        let left = (turn + n - 1) % n;
        let right = (turn + 1) % n;
        let next_turn = (turn + 1) % n;
        let dice = state[turn].min(self.config.max_dice);

        let mut outcomes = Vec::new();
        for l in 0..=dice {
            for c in 0..=dice - l {
                for r in 0..=dice - l - c {
                    let dots = dice - l - c - r;
                    let weight = binomial(u64::from(dice), u64::from(l))
                        * binomial(u64::from(dice - l), u64::from(c))
                        * binomial(u64::from(dice - l - c), u64::from(r))
                        * DOT_FACES.pow(dots);

                    let mut next = *state;
                    next[turn] -= l + c + r;
                    next[left] += l;
                    next[right] += r;

                    let step = if next[next_turn] == next.total() {
                        Step::Terminal(Self::winner(next_turn))
                    } else {
                        Step::Continue {
                            state: next,
                            turn: next_turn,
                        }
                    };
                    outcomes.push((step, weight));
                }
            }
        }
        outcomes
    }
}

impl RotationalSymmetry for LeftCenterRight {
    fn rotate(&self, state: &Seats, player: usize) -> Seats {
        state.rotated_prefix(state.len(), player)
    }
}
