//! Seeded, allocation-free randomness for layouts.
//!
//! Every generator owns its own `SeededRng`; there is no shared random state,
//! so two layouts built from the same seed are always identical.

/// Integer hash producing a value in [0, 1].
pub fn hash_2d(ix: i32, iz: i32, seed: u32) -> f32 {
    let mut h = (ix as u32).wrapping_mul(374761393)
        .wrapping_add((iz as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

/// Small deterministic generator (hash of an incrementing counter).
#[derive(Clone, Debug)]
pub struct SeededRng {
    seed: u32,
    counter: i32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { seed, counter: 0 }
    }

    /// Next value in [0, 1].
    pub fn next_f32(&mut self) -> f32 {
        let value = hash_2d(self.counter, self.counter.wrapping_mul(31), self.seed);
        self.counter = self.counter.wrapping_add(1);
        value
    }

    /// Next value in [min, max].
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Next integer in [min, max].
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        min + ((self.next_f32() * span) as u32).min(max - min)
    }

    /// Pick one element. Returns `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.range_u32(0, items.len() as u32 - 1) as usize;
        items.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_range() {
        for i in -50..50 {
            let h = hash_2d(i, i * 3, 7);
            assert!((0.0..=1.0).contains(&h));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let same = (0..32).filter(|_| a.next_f32() == b.next_f32()).count();
        assert!(same < 32);
    }

    #[test]
    fn test_range_u32_bounds() {
        let mut rng = SeededRng::new(9);
        for _ in 0..500 {
            let v = rng.range_u32(3, 5);
            assert!((3..=5).contains(&v));
        }
        assert_eq!(rng.range_u32(4, 4), 4);
    }

    #[test]
    fn test_pick() {
        let mut rng = SeededRng::new(3);
        let empty: [u32; 0] = [];
        assert!(rng.pick(&empty).is_none());
        let items = [1, 2, 3];
        for _ in 0..20 {
            assert!(items.contains(rng.pick(&items).unwrap()));
        }
    }
}
