//! Dreidel game state.

use std::fmt;

use crate::games::seats::{Seats, MAX_SEATS};

/// Holdings of every player still in, plus the pot.
///
/// The pot is stored in the slot after the last player, so the whole state
/// is one weak composition once the per-player minimum and the pot's one
/// guaranteed coin are subtracted.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DreidelState {
    seats: Seats,
}

impl DreidelState {
    /// Build a state from player holdings and the pot.
    ///
    /// # Panics
    /// Panics if there are more than `MAX_SEATS - 1` players.
    pub fn new(holdings: &[u32], pot: u32) -> Self {
        assert!(
            holdings.len() < MAX_SEATS,
            "{} players exceed the seat limit of {}",
            holdings.len(),
            MAX_SEATS - 1
        );
        let mut seats = Seats::zeroed(holdings.len() + 1);
        seats.as_mut_slice()[..holdings.len()].copy_from_slice(holdings);
        seats[holdings.len()] = pot;
        Self { seats }
    }

    /// The state right after the opening ante: every player started with
    /// `coins_each` and has put one coin in the pot.
    ///
    /// # Panics
    /// Panics if `coins_each` is zero.
    pub fn opening(players: usize, coins_each: u32) -> Self {
        assert!(coins_each > 0, "players must start with at least one coin");
        let holdings = vec![coins_each - 1; players];
        Self::new(&holdings, players as u32)
    }

    pub(crate) fn from_seats(seats: Seats) -> Self {
        debug_assert!(!seats.is_empty());
        Self { seats }
    }

    pub(crate) fn seats(&self) -> &Seats {
        &self.seats
    }

    /// Number of players still in.
    #[inline]
    pub fn players(&self) -> usize {
        self.seats.len() - 1
    }

    /// Holdings of the players still in.
    #[inline]
    pub fn holdings(&self) -> &[u32] {
        &self.seats.as_slice()[..self.players()]
    }

    /// Coins in the pot.
    #[inline]
    pub fn pot(&self) -> u32 {
        self.seats[self.players()]
    }

    /// All coins in play.
    pub fn total(&self) -> u32 {
        self.seats.total()
    }
}

impl fmt::Display for DreidelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, h) in self.holdings().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", h)?;
        }
        write!(f, " | {})", self.pot())
    }
}

impl fmt::Debug for DreidelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_state() {
        let state = DreidelState::opening(4, 3);
        assert_eq!(state.players(), 4);
        assert_eq!(state.holdings(), &[2, 2, 2, 2]);
        assert_eq!(state.pot(), 4);
        assert_eq!(state.total(), 12);
    }

    #[test]
    fn test_display() {
        assert_eq!(DreidelState::new(&[3, 0, 2], 1).to_string(), "(3, 0, 2 | 1)");
    }
}
