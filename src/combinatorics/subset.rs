//! Ranking and unranking of k-subsets.
//!
//! Subsets are represented as strictly increasing slices of `u64`.

use super::binomial;

/// Colex rank of a k-subset given as a strictly increasing slice.
///
/// The rank is independent of the universe size: `{0, 3}` has rank 3 whether
/// it is read as a subset of `{0..4}` or of `{0..100}`.
pub fn rank_subset(subset: &[u64]) -> u64 {
    debug_assert!(
        subset.windows(2).all(|w| w[0] < w[1]),
        "subset must be strictly increasing: {:?}",
        subset
    );
    subset
        .iter()
        .enumerate()
        .map(|(j, &c)| binomial(c, j as u64 + 1))
        .sum()
}

/// The k-subset of `{0..n-1}` with colex rank `rank`.
///
/// # Panics
/// Panics if `rank >= C(n, k)`.
pub fn unrank_subset(rank: u64, n: u64, k: usize) -> Vec<u64> {
    let mut subset = vec![0; k];
    unrank_subset_into(rank, n, &mut subset);
    subset
}

/// Allocation-free [`unrank_subset`]; `k` is `out.len()`.
pub fn unrank_subset_into(rank: u64, n: u64, out: &mut [u64]) {
    let k = out.len();
    peel(rank, n, k, |position, element| out[position] = element);
}

/// Walk the subset with colex rank `rank` from its largest element down.
///
/// Calls `emit(position, element)` for positions `k - 1, k - 2, ..., 0`.
/// The binomial `C(n, k)` is maintained incrementally as `n` and `k` shrink,
/// so each step costs a multiply and a divide instead of a fresh binomial.
pub(crate) fn peel<F>(mut rank: u64, mut n: u64, mut k: usize, mut emit: F)
where
    F: FnMut(usize, u64),
{
    let total = binomial(n, k as u64);
    assert!(
        rank < total,
        "rank {} out of range for {}-subsets of {{0..{}}} (count {})",
        rank,
        k,
        n,
        total
    );

    // Invariant at loop head: offset == C(n, k)
    let mut offset = total;
    while k > 0 {
        // C(n - 1, k) = C(n, k) * (n - k) / n
        offset = (u128::from(offset) * u128::from(n - k as u64) / u128::from(n)) as u64;
        n -= 1;
        if rank >= offset {
            rank -= offset;
            k -= 1;
            emit(k, n);
            if (k as u64) < n {
                // C(n, k) = C(n, k + 1) * (k + 1) / (n - k)
                offset =
                    (u128::from(offset) * (k as u128 + 1) / u128::from(n - k as u64)) as u64;
            }
        }
    }
}

/// Lexicographic rank of a k-subset of `{0..n-1}`.
///
/// Computed from the colex rank of the mirrored subset:
/// `lex(S) = C(n, k) - 1 - colex({n - 1 - c : c in S})`.
pub fn rank_subset_lex(subset: &[u64], n: u64) -> u64 {
    let mirrored: Vec<u64> = subset.iter().rev().map(|&c| n - 1 - c).collect();
    binomial(n, subset.len() as u64) - 1 - rank_subset(&mirrored)
}

/// The k-subset of `{0..n-1}` with lexicographic rank `rank`.
///
/// # Panics
/// Panics if `rank >= C(n, k)`.
pub fn unrank_subset_lex(rank: u64, n: u64, k: usize) -> Vec<u64> {
    let total = binomial(n, k as u64);
    assert!(rank < total, "lex rank {} out of range (count {})", rank, total);
    let mirrored = unrank_subset(total - 1 - rank, n, k);
    mirrored.iter().rev().map(|&c| n - 1 - c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colex_order_listing() {
        let listed: Vec<Vec<u64>> = (0..6).map(|r| unrank_subset(r, 4, 2)).collect();
        assert_eq!(
            listed,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 3],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_rank_independent_of_universe() {
        assert_eq!(rank_subset(&[0, 3]), 3);
        assert_eq!(unrank_subset(3, 4, 2), vec![0, 3]);
        assert_eq!(unrank_subset(3, 40, 2), vec![0, 3]);
    }

    #[test]
    fn test_round_trip_exhaustive_small() {
        for n in 0..=12u64 {
            for k in 0..=n as usize {
                let count = binomial(n, k as u64);
                let mut previous: Option<Vec<u64>> = None;
                for r in 0..count {
                    let subset = unrank_subset(r, n, k);
                    assert_eq!(subset.len(), k);
                    assert!(subset.windows(2).all(|w| w[0] < w[1]));
                    assert!(subset.iter().all(|&c| c < n));
                    assert_eq!(rank_subset(&subset), r, "n={} k={} r={}", n, k, r);

                    // Colex: compare reversed sequences
                    if let Some(prev) = previous {
                        let a: Vec<u64> = prev.iter().rev().copied().collect();
                        let b: Vec<u64> = subset.iter().rev().copied().collect();
                        assert!(a < b, "{:?} should precede {:?}", prev, subset);
                    }
                    previous = Some(subset);
                }
            }
        }
    }

    #[test]
    fn test_edge_sizes() {
        assert_eq!(unrank_subset(0, 5, 0), Vec::<u64>::new());
        assert_eq!(unrank_subset(0, 5, 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(rank_subset(&[]), 0);
    }

    #[test]
    fn test_large_universe_round_trip() {
        let n = 60;
        let k = 7;
        let count = binomial(n, k as u64);
        for r in [0, 1, count / 3, count / 2, count - 2, count - 1] {
            assert_eq!(rank_subset(&unrank_subset(r, n, k)), r);
        }
    }

    #[test]
    fn test_lex_order() {
        let listed: Vec<Vec<u64>> = (0..6).map(|r| unrank_subset_lex(r, 4, 2)).collect();
        assert_eq!(
            listed,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        for (r, subset) in listed.iter().enumerate() {
            assert_eq!(rank_subset_lex(subset, 4), r as u64);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_unrank_out_of_range_panics() {
        unrank_subset(10, 5, 2);
    }
}
