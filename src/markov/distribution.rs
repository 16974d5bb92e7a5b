//! Frequency aggregation of raw move outcomes.
//!
//! Games produce outcome streams in which the same successor can appear many
//! times (different dice rolls landing on the same holdings). Aggregation
//! merges them into one entry per distinct step before the solver sees them.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::markov::game::{Step, Successor};

/// A finite distribution over steps, stored as integer weights.
#[derive(Debug, Clone)]
pub struct Distribution<S: Eq + Hash> {
    weights: FxHashMap<Step<S>, u64>,
    total: u64,
}

impl<S: Eq + Hash> Default for Distribution<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Eq + Hash> Distribution<S> {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self {
            weights: FxHashMap::default(),
            total: 0,
        }
    }

    /// Build a distribution from weighted outcomes.
    pub fn from_weighted<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (Step<S>, u64)>,
    {
        let mut distribution = Self::new();
        for (step, weight) in outcomes {
            distribution.add(step, weight);
        }
        distribution
    }

    /// Add `weight` to `step`.
    pub fn add(&mut self, step: Step<S>, weight: u64) {
        if weight == 0 {
            return;
        }
        *self.weights.entry(step).or_insert(0) += weight;
        self.total += weight;
    }

    /// Number of distinct steps.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if no outcome has been added.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Probability of `step`, zero if it never occurs.
    pub fn probability(&self, step: &Step<S>) -> f64 {
        match self.weights.get(step) {
            Some(&w) => w as f64 / self.total as f64,
            None => 0.0,
        }
    }

    /// Normalize into successors whose probabilities sum to 1.
    pub fn into_successors(self) -> Vec<Successor<S>> {
        let total = self.total as f64;
        self.weights
            .into_iter()
            .map(|(step, weight)| Successor {
                step,
                probability: weight as f64 / total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::game::Outcome;

    #[test]
    fn test_duplicates_are_merged() {
        let dist = Distribution::from_weighted(vec![
            (Step::Continue { state: 7u32, turn: 1 }, 1),
            (Step::Continue { state: 7u32, turn: 1 }, 2),
            (Step::Continue { state: 7u32, turn: 0 }, 1),
            (Step::Terminal(Outcome::FocusWins), 4),
        ]);

        assert_eq!(dist.len(), 3);
        assert_eq!(dist.total_weight(), 8);
        assert_eq!(dist.probability(&Step::Continue { state: 7, turn: 1 }), 0.375);
        assert_eq!(dist.probability(&Step::Terminal(Outcome::FocusWins)), 0.5);
        assert_eq!(dist.probability(&Step::Terminal(Outcome::FocusLoses)), 0.0);
    }

    #[test]
    fn test_successors_sum_to_one() {
        let dist = Distribution::from_weighted((0..10u32).map(|s| {
            (Step::Continue { state: s % 3, turn: 0 }, u64::from(s) + 1)
        }));
        let successors = dist.into_successors();
        assert_eq!(successors.len(), 3);
        let total: f64 = successors.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_ignored() {
        let mut dist: Distribution<u32> = Distribution::new();
        dist.add(Step::Terminal(Outcome::FocusLoses), 0);
        assert!(dist.is_empty());
    }
}
