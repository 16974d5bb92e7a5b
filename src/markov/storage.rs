//! Level-indexed value storage.
//!
//! Each solved level owns one dense vector of values indexed by
//! `rank * players + turn`. Levels are written exactly once and are read-only
//! afterwards; nothing is removed until the table is dropped.

use rustc_hash::FxHashMap;

/// Values for every `(state, turn)` row of one level.
#[derive(Debug, Clone)]
pub struct LevelValues {
    players: usize,
    values: Vec<f64>,
}

impl LevelValues {
    /// Number of turn slots per state.
    pub fn players(&self) -> usize {
        self.players
    }

    /// Number of states at this level.
    pub fn num_states(&self) -> usize {
        self.values.len() / self.players
    }

    /// Value of `(rank, turn)`, or `None` when out of range.
    #[inline]
    pub fn get(&self, rank: usize, turn: usize) -> Option<f64> {
        if turn >= self.players {
            return None;
        }
        self.values.get(rank * self.players + turn).copied()
    }

    /// Raw values in row order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Write-once table of solved levels.
///
/// Tracks the highest level written so callers can tell which prefix of
/// levels is complete.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    levels: FxHashMap<usize, LevelValues>,
    highest_solved: Option<usize>,
}

impl ValueTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `level` has been stored.
    pub fn is_solved(&self, level: usize) -> bool {
        self.levels.contains_key(&level)
    }

    /// Highest level stored so far.
    pub fn highest_solved(&self) -> Option<usize> {
        self.highest_solved
    }

    /// Store the solution of `level`.
    ///
    /// # Panics
    /// Panics if the level was already stored or the vector length is not a
    /// multiple of `players`.
    pub fn insert(&mut self, level: usize, players: usize, values: Vec<f64>) {
        assert!(players > 0, "level {} has no players", level);
        assert_eq!(
            values.len() % players,
            0,
            "level {}: {} values do not split into {} turns",
            level,
            values.len(),
            players
        );
        let previous = self.levels.insert(level, LevelValues { players, values });
        assert!(previous.is_none(), "level {} was already solved", level);
        self.highest_solved = Some(self.highest_solved.map_or(level, |h| h.max(level)));
    }

    /// Values of a solved level.
    pub fn level(&self, level: usize) -> Option<&LevelValues> {
        self.levels.get(&level)
    }

    /// Value of `(rank, turn)` at `level`, or `None` if never stored.
    #[inline]
    pub fn get(&self, level: usize, rank: usize, turn: usize) -> Option<f64> {
        self.levels.get(&level).and_then(|values| values.get(rank, turn))
    }

    /// Number of solved levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Total number of stored values.
    pub fn num_entries(&self) -> usize {
        self.levels.values().map(|l| l.values.len()).sum()
    }

    /// Approximate heap usage of the stored values, in bytes.
    pub fn memory_usage(&self) -> usize {
        self.num_entries() * std::mem::size_of::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = ValueTable::new();
        assert_eq!(table.highest_solved(), None);

        table.insert(2, 2, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        assert!(table.is_solved(2));
        assert!(!table.is_solved(3));
        assert_eq!(table.highest_solved(), Some(2));
        assert_eq!(table.get(2, 1, 0), Some(0.3));
        assert_eq!(table.get(2, 2, 1), Some(0.6));
        assert_eq!(table.get(2, 3, 0), None);
        assert_eq!(table.get(2, 0, 2), None);
        assert_eq!(table.get(3, 0, 0), None);
        assert_eq!(table.level(2).map(|l| l.num_states()), Some(3));

        table.insert(1, 1, vec![1.0]);
        assert_eq!(table.highest_solved(), Some(2));
        assert_eq!(table.num_levels(), 2);
        assert_eq!(table.num_entries(), 7);
        assert_eq!(table.memory_usage(), 56);
    }

    #[test]
    #[should_panic(expected = "already solved")]
    fn test_levels_are_write_once() {
        let mut table = ValueTable::new();
        table.insert(3, 1, vec![1.0]);
        table.insert(3, 1, vec![2.0]);
    }
}
