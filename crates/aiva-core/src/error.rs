//! Error types for AIVA

use thiserror::Error;

/// Core AIVA errors
///
/// The viseme simulator itself never fails; these cover the edges around it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AivaError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config read failed: {0}")]
    ConfigIo(String),

    #[error("Config parse failed: {0}")]
    ConfigParse(String),

    // Speech output errors
    #[error("Speech output error: {0}")]
    SpeechOutput(String),

    #[error("Speech synthesis not supported by this output")]
    SpeechUnsupported,

    // Avatar errors
    #[error("Avatar exposes no mesh or bone to drive the mouth")]
    RigUnbound,
}

/// Result type for AIVA operations
pub type AivaResult<T> = Result<T, AivaError>;
