//! Combinatorial indexing.
//!
//! Dense bijections between integers and combinatorial objects, used to map
//! game states directly onto matrix rows without any lookup table:
//!
//! - **k-subsets** of `{0..n-1}` in colex order (and lex order, see [`subset`])
//! - **weak compositions** of `s` into `n` nonnegative parts, via stars and bars
//!
//! Both families are total: every rank in `[0, count)` corresponds to exactly
//! one object. Out-of-range ranks and inconsistent arguments are programming
//! errors and panic.
//!
//! ## Colex order
//!
//! ```text
//! rank  subset (n = 4, k = 2)
//!   0   {0, 1}
//!   1   {0, 2}
//!   2   {1, 2}
//!   3   {0, 3}
//!   4   {1, 3}
//!   5   {2, 3}
//! ```
//!
//! The colex rank of `S = {s_0 < s_1 < ... < s_{k-1}}` is `sum_j C(s_j, j + 1)`,
//! which does not depend on the universe size `n`.

pub mod composition;
pub mod subset;

pub use composition::{
    composition_count, rank_weak_composition, unrank_weak_composition,
    unrank_weak_composition_into,
};
pub use subset::{rank_subset, rank_subset_lex, unrank_subset, unrank_subset_into, unrank_subset_lex};

/// Binomial coefficient `C(n, k)`, or `None` if it does not fit in a `u64`.
pub fn checked_binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc == C(n, i) here, so the division is exact
        acc = acc * u128::from(n - i) / u128::from(i + 1);
        if acc > u128::from(u64::MAX) {
            return None;
        }
    }
    Some(acc as u64)
}

/// Binomial coefficient `C(n, k)`; zero when `k > n`.
///
/// # Panics
/// Panics if the result overflows a `u64`. State spaces of that size cannot be
/// enumerated anyway.
pub fn binomial(n: u64, k: u64) -> u64 {
    checked_binomial(n, k).unwrap_or_else(|| panic!("C({}, {}) overflows u64", n, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_small_values() {
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(10, 3), 120);
        assert_eq!(binomial(52, 5), 2_598_960);
        assert_eq!(binomial(3, 4), 0);
    }

    #[test]
    fn test_binomial_pascal_rule() {
        for n in 1..40u64 {
            for k in 1..n {
                assert_eq!(
                    binomial(n, k),
                    binomial(n - 1, k - 1) + binomial(n - 1, k),
                    "C({}, {})",
                    n,
                    k
                );
            }
        }
    }

    #[test]
    fn test_checked_binomial_overflow() {
        assert_eq!(checked_binomial(68, 34), None);
        assert_eq!(checked_binomial(62, 31), Some(465_428_353_255_261_088));
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_binomial_panics_on_overflow() {
        binomial(200, 100);
    }
}
