//! AIVA Core - Fundamental types shared by the speech animation stack
//!
//! This crate defines the types every other AIVA crate speaks in:
//! - Identifiers (SessionId, UtteranceId)
//! - The static phoneme openness table
//! - Mouth samples and speech events
//! - Error types

pub mod id;
pub mod phoneme;
pub mod sample;
pub mod event;
pub mod error;

pub use id::*;
pub use phoneme::*;
pub use sample::*;
pub use event::*;
pub use error::*;
