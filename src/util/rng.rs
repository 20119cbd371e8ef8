//! Random sources for shot spread

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest value a single draw can return (15-bit, like C `rand()`)
pub const DRAW_MAX: i32 = 0x7fff;

/// Linear congruential generator matching the MSVC C runtime `rand()`.
///
/// Legacy clients draw spread from this sequence; replaying the same seed
/// gives identical pellet patterns.
#[derive(Debug, Clone)]
pub struct MsRand {
    state: u32,
}

impl MsRand {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_draw(&mut self) -> i32 {
        self.state = self.state.wrapping_mul(214_013).wrapping_add(2_531_011);
        ((self.state >> 16) & 0x7fff) as i32
    }
}

/// Which generator feeds the spread model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngKind {
    Seeded,
    Legacy,
}

impl std::str::FromStr for RngKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seeded" | "chacha" => Ok(Self::Seeded),
            "legacy" | "msvc" => Ok(Self::Legacy),
            other => Err(other.to_string()),
        }
    }
}

/// Source of 15-bit draws for the spread model
#[derive(Debug, Clone)]
pub enum ShotRng {
    Seeded(ChaCha8Rng),
    Legacy(MsRand),
}

impl ShotRng {
    pub fn new(kind: RngKind, seed: u64) -> Self {
        match kind {
            RngKind::Seeded => Self::seeded(seed),
            RngKind::Legacy => Self::legacy(seed as u32),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn legacy(seed: u32) -> Self {
        Self::Legacy(MsRand::new(seed))
    }

    /// One draw in `0..=DRAW_MAX`
    pub fn draw(&mut self) -> i32 {
        match self {
            Self::Seeded(rng) => rng.gen_range(0..=DRAW_MAX),
            Self::Legacy(rng) => rng.next_draw(),
        }
    }
}
