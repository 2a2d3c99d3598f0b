//! Stateless numeric kernels shared by the generators and eroders.

use noise::{NoiseFn, Perlin};

use crate::random::RandomSource;

/// Seed of the coherent noise used when a caller does not pick one.
pub const DEFAULT_NOISE_SEED: u32 = 0;

/// The coherent noise source used across the crate.
pub fn default_noise() -> Perlin {
    Perlin::new(DEFAULT_NOISE_SEED)
}

/// Classic Perlin noise remapped from [-1, 1] to [0, 1].
///
/// Integer lattice points sample to exactly 0.5.
pub fn base_noise<N: NoiseFn<f64, 2>>(noise: &N, x: f64, z: f64) -> f32 {
    ((noise.get([x, z]) + 1.0) * 0.5).clamp(0.0, 1.0) as f32
}

/// Fractal Brownian motion over [`base_noise`].
///
/// Frequency doubles every octave and amplitude is multiplied by
/// `persistence`; the sum is divided by the total amplitude so the result
/// stays in [0, 1] for any octave count. A persistence above 1 weights the
/// high octaves more than the low ones.
pub fn fbm<N: NoiseFn<f64, 2>>(noise: &N, x: f64, z: f64, octaves: u32, persistence: f64) -> f32 {
    let mut total = 0.0f64;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += base_noise(noise, x * frequency, z * frequency) as f64 * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    (total / max_value) as f32
}

/// Linear remap of `value` from [in_min, in_max] to [out_min, out_max].
///
/// A zero-width input range divides by zero and yields NaN or infinity.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    let mut n = items.len();
    while n > 1 {
        n -= 1;
        let k = rng.uniform_int(0, n as i64 + 1) as usize;
        items.swap(k, n);
    }
}

/// Smooth 0 → 1 falloff used to sink the rim of an island.
///
/// `x` is a normalized distance in [0, 1]; `a` sets the steepness and `b`
/// how far out the transition sits.
pub fn falloff_curve(x: f32, a: f32, b: f32) -> f32 {
    let xa = x.powf(a);
    xa / (xa + (b - b * x).powf(a))
}
