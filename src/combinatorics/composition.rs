//! Ranking and unranking of weak compositions.
//!
//! A weak composition of `s` into `n` parts is a length-`n` vector of
//! nonnegative integers summing to `s`. Stars and bars maps it to an
//! `(n - 1)`-subset of `{0..s+n-2}`: the bar positions are the partial sums
//! `x_0 + 1, x_0 + x_1 + 2, ...`, each minus one. Ranks are the colex ranks of
//! those subsets.
//!
//! ```text
//! parts      bars (s = 2, n = 3)   rank
//! [2, 0, 0]  {2, 3}                 5
//! [0, 0, 2]  {0, 1}                 0
//! [1, 0, 1]  {1, 2}                 2
//! ```

use super::binomial;
use super::subset::peel;

/// Number of weak compositions of `sum` into `parts` parts: `C(sum + parts - 1, parts - 1)`.
pub fn composition_count(parts: usize, sum: u32) -> u64 {
    assert!(parts > 0, "a composition needs at least one part");
    binomial(u64::from(sum) + parts as u64 - 1, parts as u64 - 1)
}

/// Colex rank of a weak composition.
pub fn rank_weak_composition(parts: &[u32]) -> u64 {
    assert!(!parts.is_empty(), "a composition needs at least one part");
    let mut bar: u64 = 0;
    let mut rank = 0;
    for (j, &x) in parts[..parts.len() - 1].iter().enumerate() {
        bar += u64::from(x) + 1;
        rank += binomial(bar - 1, j as u64 + 1);
    }
    rank
}

/// The weak composition of `sum` into `n` parts with colex rank `rank`.
///
/// # Panics
/// Panics if `n == 0` or `rank >= composition_count(n, sum)`.
pub fn unrank_weak_composition(rank: u64, n: usize, sum: u32) -> Vec<u32> {
    let mut parts = vec![0; n];
    unrank_weak_composition_into(rank, sum, &mut parts);
    parts
}

/// Allocation-free [`unrank_weak_composition`]; `n` is `parts.len()`.
///
/// Bars are recovered largest first, and each part is the gap between
/// neighbouring bars, with implicit bars at `-1` and `sum + n - 1`.
pub fn unrank_weak_composition_into(rank: u64, sum: u32, parts: &mut [u32]) {
    let n = parts.len();
    assert!(n > 0, "a composition needs at least one part");
    let universe = u64::from(sum) + n as u64 - 1;

    let mut upper = universe;
    peel(rank, universe, n - 1, |position, bar| {
        parts[position + 1] = (upper - bar - 1) as u32;
        upper = bar;
    });
    parts[0] = upper as u32;
}
