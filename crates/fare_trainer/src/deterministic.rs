//! Deterministic randomness for reproducible forests
//!
//! Every tree draws its bootstrap sample and feature subsets from its own
//! LCG stream seeded with `seed + tree_index`, so a forest is reproducible
//! regardless of how rayon schedules the trees.

use std::num::Wrapping;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses constants from Numerical Recipes (glibc)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    // LCG constants (compatible with glibc)
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: i64) -> Self {
        Self {
            state: Wrapping(seed.wrapping_abs() % Self::MODULUS),
        }
    }

    /// Stream for one ensemble member
    pub fn for_member(seed: u64, member: usize) -> Self {
        Self::new(seed.wrapping_add(member as u64) as i64)
    }

    /// Generate next random i64 in range [0, MODULUS)
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        self.state.0 & (Self::MODULUS - 1)
    }

    /// Uniform index in `[0, bound)`, scaled from the high bits
    pub fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        ((self.next_i64() as u128 * bound as u128) >> 31) as usize
    }

    /// `n` row indices drawn with replacement
    pub fn bootstrap(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.next_index(n)).collect()
    }

    /// `k` distinct feature indices out of `n`, ascending
    pub fn choose_features(&mut self, n: usize, k: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..n).collect();
        let k = k.min(n);
        // Partial Fisher-Yates
        for i in 0..k {
            let j = i + self.next_index(n - i);
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool.sort_unstable();
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_determinism() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_i64(), rng2.next_i64());
        }
    }

    #[test]
    fn test_index_range() {
        let mut rng = LcgRng::new(42);
        for bound in [1, 2, 7, 1000] {
            for _ in 0..200 {
                assert!(rng.next_index(bound) < bound);
            }
        }
        assert_eq!(rng.next_index(0), 0);
    }

    #[test]
    fn test_members_get_distinct_streams() {
        let a = LcgRng::for_member(42, 0).bootstrap(50);
        let b = LcgRng::for_member(42, 1).bootstrap(50);
        assert_eq!(a, LcgRng::for_member(42, 0).bootstrap(50));
        assert_ne!(a, b);
    }

    #[test]
    fn test_bootstrap_draws_with_replacement() {
        let sample = LcgRng::new(7).bootstrap(100);
        assert_eq!(sample.len(), 100);
        assert!(sample.iter().all(|&i| i < 100));

        let mut distinct = sample.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert!(distinct.len() < 100);
    }

    #[test]
    fn test_choose_features_distinct_sorted() {
        let mut rng = LcgRng::new(3);
        let chosen = rng.choose_features(10, 4);
        assert_eq!(chosen.len(), 4);
        assert!(chosen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(rng.choose_features(3, 10), vec![0, 1, 2]);
    }
}
