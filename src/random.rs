//! Injectable randomness.
//!
//! Every stochastic pass takes a `&mut impl RandomSource`, so a seeded
//! `ChaCha8Rng` makes a whole generation run reproducible.

use rand::Rng;

/// Uniform draws in the shape the terrain algorithms consume them.
pub trait RandomSource {
    /// Uniform float in `[min, max]`. Bounds may be given in either order;
    /// equal bounds return `min`.
    fn uniform(&mut self, min: f32, max: f32) -> f32;

    /// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
    fn uniform_int(&mut self, min: i64, max: i64) -> i64;

    /// Uniform cell index in `[0, len)`.
    fn index(&mut self, len: usize) -> usize {
        self.uniform_int(0, len as i64) as usize
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        self.gen_range(lo..=hi)
    }

    fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.gen_range(min..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_uniform_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rng.uniform(0.2, 0.4);
            assert!((0.2..=0.4).contains(&v));
            let r = rng.uniform(0.4, 0.2);
            assert!((0.2..=0.4).contains(&r));
            let i = rng.uniform_int(0, 5);
            assert!((0..5).contains(&i));
        }
    }

    #[test]
    fn test_degenerate_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(rng.uniform(0.5, 0.5), 0.5);
        assert_eq!(rng.uniform_int(3, 3), 3);
        assert_eq!(rng.index(0), 0);
    }
}
