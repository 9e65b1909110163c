//! Seeded random source for the simulation

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random numbers from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[lo, hi]`
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..=hi)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            return true;
        }
        self.range(0.0, 1.0) < p
    }

    /// Uniform index in `0..len` (`len` must be non-zero)
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    /// -1 or +1
    pub fn sign(&mut self) -> f32 {
        if self.inner.random_bool(0.5) { 1.0 } else { -1.0 }
    }
}
