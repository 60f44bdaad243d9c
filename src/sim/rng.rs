//! Random sampling for procedural generation
//!
//! Terrain and spawner code only ever asks for a biased coin flip or a
//! (weighted) pick, so that is all [`RandomSource`] exposes. Tests swap in
//! scripted sources to force gaps and spawn kinds.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Random choice/boolean sampling
pub trait RandomSource {
    /// True with probability `p` (clamped to [0, 1])
    fn chance(&mut self, p: f32) -> bool;

    /// Index in `0..len` (len > 0)
    fn index(&mut self, len: usize) -> usize;

    /// Uniform pick from a non-empty slice
    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.index(items.len())]
    }

    /// Weighted pick; zero-weight entries are never chosen.
    /// Falls back to the first entry if every weight is zero.
    fn pick_weighted<T: Copy>(&mut self, items: &[(T, u32)]) -> T {
        let total = items
            .iter()
            .fold(0u64, |acc, (_, w)| acc.saturating_add(u64::from(*w)));
        if total == 0 {
            return items[0].0;
        }
        let span = usize::try_from(total).unwrap_or(usize::MAX);
        let mut roll = self.index(span) as u64;
        for (item, weight) in items {
            let weight = u64::from(*weight);
            if roll < weight {
                return *item;
            }
            roll -= weight;
        }
        items[items.len() - 1].0
    }
}

/// Seeded PCG32 stream owned by a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    pub seed: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw a seed for a follow-up run
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }
}

impl RandomSource for SimRng {
    fn chance(&mut self, p: f32) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0) as f64)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same index
    struct Fixed(usize);

    impl RandomSource for Fixed {
        fn chance(&mut self, _p: f32) -> bool {
            true
        }
        fn index(&mut self, len: usize) -> usize {
            self.0.min(len - 1)
        }
    }

    #[test]
    fn test_pick_weighted_respects_weights() {
        let table = [('b', 2), ('p', 1), ('c', 1), ('o', 1)];
        // Rolls 0 and 1 land on the weight-2 entry
        assert_eq!(Fixed(0).pick_weighted(&table), 'b');
        assert_eq!(Fixed(1).pick_weighted(&table), 'b');
        assert_eq!(Fixed(2).pick_weighted(&table), 'p');
        assert_eq!(Fixed(3).pick_weighted(&table), 'c');
        assert_eq!(Fixed(4).pick_weighted(&table), 'o');
    }

    #[test]
    fn test_pick_weighted_skips_zero_weight() {
        let table = [('x', 0), ('y', 3)];
        for i in 0..3 {
            assert_eq!(Fixed(i).pick_weighted(&table), 'y');
        }
    }

    #[test]
    fn test_pick_weighted_handles_huge_weights() {
        let table = [('b', u32::MAX), ('p', u32::MAX), ('c', 1)];
        assert_eq!(Fixed(0).pick_weighted(&table), 'b');
        assert_eq!(Fixed(u32::MAX as usize).pick_weighted(&table), 'p');
        assert_eq!(Fixed(2 * u32::MAX as usize).pick_weighted(&table), 'c');

        let mut rng = SimRng::new(3);
        for _ in 0..100 {
            assert!(matches!(rng.pick_weighted(&table), 'b' | 'p' | 'c'));
        }
    }

    #[test]
    fn test_sim_rng_is_deterministic() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.index(1000), b.index(1000));
            assert_eq!(a.chance(0.3), b.chance(0.3));
        }
    }

    #[test]
    fn test_weighted_distribution_roughly_matches() {
        let mut rng = SimRng::new(7);
        let table = [(0usize, 2), (1, 1), (2, 1), (3, 1)];
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[rng.pick_weighted(&table)] += 1;
        }
        // Bamboo-like entry should be about twice as common as each other
        assert!(counts[0] > 3500 && counts[0] < 4500, "{:?}", counts);
        for c in &counts[1..] {
            assert!(*c > 1600 && *c < 2400, "{:?}", counts);
        }
    }
}
