//! AIVA Runtime - Composition of the speech animation stack
//!
//! This crate wires the pieces together:
//! 1. Load configuration (file, then environment overrides)
//! 2. Install logging
//! 3. Hand utterances to a speech-output driver
//! 4. Start/stop the viseme simulator on the driver's lifecycle events
//! 5. Poll the simulator once per frame and pose the avatar

pub mod config;
pub mod frame;
pub mod logging;
pub mod speaker;

pub use config::*;
pub use frame::*;
pub use logging::*;
pub use speaker::*;
