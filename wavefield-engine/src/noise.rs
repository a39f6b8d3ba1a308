//! Pluggable randomness for the wave noise term.
//!
//! Every noisy evaluation draws one value from a [`NoiseSource`]. Production
//! code uses [`StdNoise`] (a seedable `StdRng`); tests swap in [`ZeroNoise`] or
//! a fixed [`SequenceNoise`] so noisy paths become reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed values in **[-1, 1]**.
pub trait NoiseSource {
    fn next_uniform(&mut self) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// `StdRng`-backed source. Seed it for replayable runs.
#[derive(Clone, Debug)]
pub struct StdNoise {
    rng: StdRng,
}

impl StdNoise {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl Default for StdNoise {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl NoiseSource for StdNoise {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Always returns `0.0`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        0.0
    }
}

/// Cycles through a fixed list of values (each clamped to [-1, 1]).
/// An empty list behaves like [`ZeroNoise`].
#[derive(Clone, Debug, Default)]
pub struct SequenceNoise {
    values: Vec<f64>,
    next: usize,
}

impl SequenceNoise {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 })
            .collect();
        Self { values, next: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl NoiseSource for SequenceNoise {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            self.next += 1;
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}
