//! Bounded integer sampling for terrain generation
//!
//! The generator is not seeded by default; tests and the demo binary pass a
//! seed to get a repeatable landscape.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::error::RangeError;

/// Uniform integer source over inclusive ranges
#[derive(Debug, Clone)]
pub struct RandomDistribution {
    rng: Pcg32,
}

impl RandomDistribution {
    /// Seed from the thread RNG (a different landscape every session)
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// Repeatable sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, from entropy otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform sample in `[low, high]`
    pub fn next_int(&mut self, low: i32, high: i32) -> Result<i32, RangeError> {
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(self.rng.random_range(low..=high))
    }
}
