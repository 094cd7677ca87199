//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call a platform RNG. All
//! randomness flows through one `EngineRng` seeded from the master
//! seed, so the same seed and command script always replay to an
//! identical event stream.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct EngineRng {
    inner: Pcg64Mcg,
}

impl EngineRng {
    pub fn new(master_seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(master_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    /// p <= 0.0 never fires; p >= 1.0 always fires.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
