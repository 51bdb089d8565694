//! Per-entity deterministic random streams
//!
//! Every stochastic actor owns its own `PseudoRandom`, seeded from a stable
//! identifier. Outcomes therefore depend only on the actor and the number of
//! draws it has made, never on what other executions did earlier in the tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::UnitId;

#[derive(Debug, Clone)]
pub struct PseudoRandom {
    rng: ChaCha8Rng,
}

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Stream bound to a unit for its whole lifetime
    pub fn for_unit(id: UnitId) -> Self {
        Self::new(u64::from(id.0))
    }

    /// Uniform value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// True with probability `p` (clamped to `[0, 1]`)
    ///
    /// Always consumes exactly one draw so the stream position does not
    /// depend on `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        let roll = self.next_f64();
        roll < p.clamp(0.0, 1.0)
    }

    /// Uniform integer in `[low, high)`
    pub fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}
