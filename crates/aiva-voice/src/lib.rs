//! AIVA Voice - Viseme timing simulator
//!
//! This is NOT a text-to-speech engine and NOT a phoneme recognizer.
//! It turns an utterance into a timed stream of mouth samples so an avatar
//! can move its mouth while a speech-output driver plays the real audio.
//!
//! # Model
//!
//! - One character per tick, at a fixed cadence (50ms by default)
//! - Openness comes from a static per-character table
//! - Pitch is a pseudo-random cue in [0.7, 1.0]
//! - Every session ends with a single silent sample
//!
//! At most one session runs at a time. A new `start` supersedes the old one
//! and no sample of the old session is published after it returns.

pub mod bus;
pub mod config;
pub mod pitch;
pub mod session;
pub mod simulator;

pub use bus::*;
pub use config::*;
pub use pitch::*;
pub use session::*;
pub use simulator::*;
