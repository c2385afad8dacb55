//! # Random Source
//!
//! Every random decision in the simulation (match delay, partner name, whether
//! a peer speaks, what they say) goes through a [`RandomSource`]. The session
//! receives one at construction time, so a run can be made fully
//! deterministic by handing it a seeded or scripted source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform values in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Production source backed by `StdRng`.
///
/// With a seed the whole session replays identically; without one it is
/// seeded from the OS.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Replays a fixed list of values, wrapping around when exhausted.
///
/// An empty script behaves like `[0.0]`. Values outside `[0, 1)` are clamped.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that returns the same value on every call.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, MAX_UNIT)
    }
}

/// Largest f64 strictly below 1.0.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

/// Picks one element uniformly. Returns `None` only for an empty pool.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, pool: &'a [T]) -> Option<&'a T> {
    if pool.is_empty() {
        return None;
    }
    let index = (rng.next_f64() * pool.len() as f64) as usize;
    pool.get(index.min(pool.len() - 1))
}

/// Uniform integer in `[lo, hi]`. Arguments in the wrong order are swapped.
pub fn range_inclusive(rng: &mut dyn RandomSource, lo: u64, hi: u64) -> u64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let span = (hi - lo).saturating_add(1);
    let offset = (rng.next_f64() * span as f64) as u64;
    lo.saturating_add(offset).min(hi)
}
