//! AIVA Visual - Turning mouth samples into avatar motion
//!
//! This is NOT a renderer and NOT a rigging system. It decides WHAT to set
//! on an already-loaded avatar; the host engine does the setting.
//!
//! # Drive Strategies
//!
//! The mouth is driven by the first strategy the avatar supports:
//!
//! 1. Morph target influence (blend shape named like "mouthOpen")
//! 2. Jaw bone rotation
//! 3. Mouth mesh vertical scale

pub mod motion;
pub mod mouth;
pub mod rig;

pub use motion::*;
pub use mouth::*;
pub use rig::*;
