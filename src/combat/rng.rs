//! Fast PRNG for trial simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::combat::dice::DiceSource;

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from operating-system entropy, falling back to the wall clock when
    /// the entropy source is unavailable.
    pub fn from_entropy() -> Self {
        let mut buf = [0_u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => Self::new(u64::from_le_bytes(buf)),
            Err(err) => {
                tracing::warn!(%err, "entropy source unavailable, seeding from clock");
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(SPLITMIX64_GOLDEN);
                Self::new(nanos ^ u64::from(std::process::id()))
            }
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, bound)`. Rejects the low tail that would bias a plain modulo.
    #[inline]
    pub fn below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        let bound = bound.max(1);
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let value = self.next_u64();
            if value >= threshold {
                return value % bound;
            }
        }
    }
}

impl DiceSource for Rng {
    #[inline]
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.below(u64::from(sides)) as u32 + 1
    }
}
