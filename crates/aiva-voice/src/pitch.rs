//! Pitch cue sources
//!
//! The pitch cue is not derived from the text. It only has to stay inside
//! [PITCH_MIN, PITCH_MAX]; the source is pluggable so tests and consumers
//! can pin it.

use aiva_core::{PITCH_MAX, PITCH_MIN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces one pitch cue per spoken character
pub trait PitchSource: Send {
    /// Next pitch cue, within [PITCH_MIN, PITCH_MAX]
    fn next_pitch(&mut self) -> f32;
}

/// Uniformly distributed pitch cue
#[derive(Debug)]
pub struct RandomPitch {
    rng: StdRng,
}

impl RandomPitch {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPitch {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchSource for RandomPitch {
    fn next_pitch(&mut self) -> f32 {
        self.rng.gen_range(PITCH_MIN..=PITCH_MAX)
    }
}

/// Constant pitch cue, clamped into range
#[derive(Debug, Clone, Copy)]
pub struct FixedPitch(f32);

impl FixedPitch {
    pub fn new(pitch: f32) -> Self {
        FixedPitch(pitch.clamp(PITCH_MIN, PITCH_MAX))
    }
}

impl PitchSource for FixedPitch {
    fn next_pitch(&mut self) -> f32 {
        self.0
    }
}
