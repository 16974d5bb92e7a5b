//! Fixed-capacity coin vectors.
//!
//! Game states are short vectors of coin counts whose length shrinks when a
//! player is knocked out. `Seats` keeps them inline, so states are `Copy` and
//! hashing or comparing one never touches the heap.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

/// Number of slots a `Seats` can hold.
pub const MAX_SEATS: usize = 16;

/// A vector of at most [`MAX_SEATS`] coin counts.
///
/// Slots past `len` are always zero.
#[derive(Clone, Copy)]
pub struct Seats {
    slots: [u32; MAX_SEATS],
    len: u8,
}

impl Seats {
    /// Copy `counts` into a new buffer.
    ///
    /// # Panics
    /// Panics if `counts` has more than [`MAX_SEATS`] entries.
    pub fn from_slice(counts: &[u32]) -> Self {
        assert!(
            counts.len() <= MAX_SEATS,
            "{} slots exceed the capacity of {}",
            counts.len(),
            MAX_SEATS
        );
        let mut slots = [0; MAX_SEATS];
        slots[..counts.len()].copy_from_slice(counts);
        Self {
            slots,
            len: counts.len() as u8,
        }
    }

    /// `len` zeroed slots.
    pub fn zeroed(len: usize) -> Self {
        assert!(len <= MAX_SEATS, "{} slots exceed the capacity of {}", len, MAX_SEATS);
        Self {
            slots: [0; MAX_SEATS],
            len: len as u8,
        }
    }

    /// Active slots.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.slots[..self.len as usize]
    }

    /// Active slots, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.slots[..self.len as usize]
    }

    /// Number of active slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if there are no active slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of all active slots.
    pub fn total(&self) -> u32 {
        self.as_slice().iter().sum()
    }

    /// Remove slot `index`, shifting the later slots down, and return its value.
    pub fn remove(&mut self, index: usize) -> u32 {
        let len = self.len();
        assert!(index < len, "slot {} out of range for length {}", index, len);
        let value = self.slots[index];
        self.slots.copy_within(index + 1..len, index);
        self.slots[len - 1] = 0;
        self.len -= 1;
        value
    }

    /// The same slots with the first `shift` moved to the back.
    ///
    /// Only the first `prefix` slots rotate; the rest stay in place.
    pub fn rotated_prefix(&self, prefix: usize, shift: usize) -> Self {
        let mut rotated = *self;
        rotated.slots[..prefix].rotate_left(shift % prefix.max(1));
        rotated
    }
}

impl PartialEq for Seats {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Seats {}

impl Hash for Seats {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl Index<usize> for Seats {
    type Output = u32;

    #[inline]
    fn index(&self, index: usize) -> &u32 {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for Seats {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut u32 {
        &mut self.as_mut_slice()[index]
    }
}

impl fmt::Display for Seats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, count) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", count)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Seats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_remove_shifts_and_clears() {
        let mut seats = Seats::from_slice(&[4, 0, 7, 1]);
        assert_eq!(seats.remove(1), 0);
        assert_eq!(seats.as_slice(), &[4, 7, 1]);
        assert_eq!(seats.total(), 12);
        assert_eq!(seats, Seats::from_slice(&[4, 7, 1]));
    }

    #[test]
    fn test_equality_ignores_dead_slots() {
        let mut a = Seats::from_slice(&[1, 2, 3]);
        a.remove(2);
        let b = Seats::from_slice(&[1, 2]);

        let mut set = FxHashSet::default();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_rotated_prefix_keeps_tail() {
        let seats = Seats::from_slice(&[1, 2, 3, 9]);
        assert_eq!(seats.rotated_prefix(3, 1).as_slice(), &[2, 3, 1, 9]);
        assert_eq!(seats.rotated_prefix(3, 3).as_slice(), &[1, 2, 3, 9]);
        assert_eq!(seats.rotated_prefix(4, 2).as_slice(), &[3, 9, 1, 2]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Seats::from_slice(&[3, 0, 2]).to_string(), "(3, 0, 2)");
        assert_eq!(format!("{:?}", Seats::zeroed(2)), "(0, 0)");
    }

    #[test]
    #[should_panic(expected = "exceed the capacity")]
    fn test_capacity_enforced() {
        Seats::from_slice(&[1; MAX_SEATS + 1]);
    }
}
