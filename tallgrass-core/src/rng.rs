use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A source of uniform draws in `[0, 1)`.
///
/// Every roll the engine makes goes through one of these, passed in by the
/// caller. Any `FnMut() -> f64` closure qualifies, which keeps tests short:
/// `|| 0.0` always triggers an encounter and always picks the first entry.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Draws an integer uniformly from `min..=max`.
///
/// Out-of-range unit values are clamped so a misbehaving source can never
/// push the result outside the bounds.
pub fn sample_inclusive<R: RandomSource + ?Sized>(rng: &mut R, min: u16, max: u16) -> u16 {
    if max <= min {
        return min;
    }
    let span = u32::from(max - min) + 1;
    let unit = rng.next_unit().clamp(0.0, 1.0);
    let offset = ((unit * f64::from(span)) as u32).min(span - 1);
    min + offset as u16
}

/// Picks an index in `0..len` uniformly. Returns `None` for an empty pool.
pub fn sample_index<R: RandomSource + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let unit = rng.next_unit().clamp(0.0, 1.0);
    Some(((unit * len as f64) as usize).min(len - 1))
}

/// Small deterministic LCG used by the game binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }
}
