//! Simulator configuration

use std::time::Duration;

use aiva_core::{AivaError, AivaResult};

/// Default cadence: roughly one character per 50ms of speech
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Viseme simulator configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    /// Time between two samples
    pub tick_period: Duration,
    /// Seed for the pitch cue generator (`None` = OS entropy)
    pub pitch_seed: Option<u64>,
}

impl SimulatorConfig {
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    pub fn with_pitch_seed(mut self, seed: u64) -> Self {
        self.pitch_seed = Some(seed);
        self
    }

    /// Check the configuration can drive a session
    pub fn validate(&self) -> AivaResult<()> {
        if self.tick_period.is_zero() {
            return Err(AivaError::InvalidConfig(
                "tick_period must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            pitch_seed: None,
        }
    }
}
