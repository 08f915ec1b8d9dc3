//! Seeded uniform sources used by the synthetic series.
//!
//! Two recurrences are supported and both are part of the public contract:
//! charts must look identical across renders, so the exact sequence for a
//! given seed never changes.
//!
//! - [`Mulberry32`]: additive step then multiply–shift–xor mixing, output
//!   `u32 / 2^32`.
//! - [`ParkMiller`]: minimal-standard LCG `s = s * 16807 mod (2^31 - 1)`,
//!   output `(s - 1) / (2^31 - 2)`.

use rand::RngCore;
use rand::rand_core::impls::{fill_bytes_via_next, next_u64_via_u32};
use serde::{Deserialize, Serialize};

/// A deterministic source of uniform values in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32 generator. State is a 32-bit word mutated on every draw.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: i32) -> Self {
        Self { state: seed as u32 }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_bytes_via_next(self, dst)
    }
}

impl UniformSource for Mulberry32 {
    fn next_uniform(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }
}

const PARK_MILLER_MODULUS: i64 = 2_147_483_647;
const PARK_MILLER_MULTIPLIER: i64 = 16_807;

/// Park–Miller minimal standard generator.
#[derive(Debug, Clone)]
pub struct ParkMiller {
    state: i64,
}

impl ParkMiller {
    /// Seeds are reduced into `1..modulus`; zero (which would lock the
    /// recurrence at zero) is mapped to 1.
    pub fn new(seed: i32) -> Self {
        let state = (seed as i64).rem_euclid(PARK_MILLER_MODULUS);
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }
}

impl UniformSource for ParkMiller {
    fn next_uniform(&mut self) -> f64 {
        self.state = (self.state * PARK_MILLER_MULTIPLIER) % PARK_MILLER_MODULUS;
        (self.state - 1) as f64 / (PARK_MILLER_MODULUS - 1) as f64
    }
}

/// Which recurrence a series draws from, together with its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RandomScheme {
    Mulberry32 { seed: i32 },
    ParkMiller { seed: i32 },
}

impl RandomScheme {
    /// Build a fresh generator. Every call returns independent state, so
    /// two series never share a draw sequence.
    pub fn source(&self) -> Box<dyn UniformSource + Send> {
        match *self {
            Self::Mulberry32 { seed } => Box::new(Mulberry32::new(seed)),
            Self::ParkMiller { seed } => Box::new(ParkMiller::new(seed)),
        }
    }

    pub fn seed(&self) -> i32 {
        match *self {
            Self::Mulberry32 { seed } | Self::ParkMiller { seed } => seed,
        }
    }

    pub fn with_seed(&self, seed: i32) -> Self {
        match self {
            Self::Mulberry32 { .. } => Self::Mulberry32 { seed },
            Self::ParkMiller { .. } => Self::ParkMiller { seed },
        }
    }
}
