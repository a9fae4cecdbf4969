//! Injectable random source
//!
//! Every random decision in a session (word picks, shuffles, balloon sizes,
//! positions, colours, confetti) is drawn from one `RandomSource`. Games use a
//! seeded `Pcg32`; tests can replay a fixed sequence with `ScriptedRandom`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform floats in [0, 1)
pub trait RandomSource {
    /// Next uniform value in [0, 1)
    fn uniform(&mut self) -> f32;

    /// Uniform value in [lo, hi). Returns `lo` when the range is empty.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + self.uniform() * (hi - lo)
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.uniform() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in the closed range [lo, hi]
    fn int_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        lo + self.index(hi - lo + 1)
    }
}

impl RandomSource for Pcg32 {
    fn uniform(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded game RNG
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Fisher-Yates shuffle in place
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Draw up to `count` items without replacement, in draw order
pub fn sample<T: Clone, R: RandomSource + ?Sized>(rng: &mut R, pool: &[T], count: usize) -> Vec<T> {
    let mut pool = pool.to_vec();
    let count = count.min(pool.len());
    // Partial Fisher-Yates from the front
    for i in 0..count {
        let j = i + rng.index(pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

/// Replays a fixed sequence of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Values are clamped into [0, 1). An empty script always yields 0.
    pub fn new(values: Vec<f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
