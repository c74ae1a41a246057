//! AIVA configuration
//!
//! Loaded from JSON, then overridden from the environment:
//!
//! | variable | field |
//! |---|---|
//! | `AIVA_TICK_PERIOD` | `simulator.tick_period` (humantime, e.g. `50ms`) |
//! | `AIVA_PITCH_SEED` | `simulator.pitch_seed` |
//! | `AIVA_SPEECH_LANG` | `speech.lang` |
//! | `AIVA_LOG_LEVEL` | `logging.level` |
//! | `AIVA_LOG_JSON` | `logging.json` |

use std::path::Path;
use std::time::Duration;

use aiva_core::{AivaError, AivaResult};
use aiva_visual::RigConfig;
use aiva_voice::{SimulatorConfig, DEFAULT_TICK_PERIOD};
use serde::{Deserialize, Deserializer};

fn humantime_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Simulator section
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    #[serde(deserialize_with = "humantime_duration")]
    pub tick_period: Duration,
    pub pitch_seed: Option<u64>,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            pitch_seed: None,
        }
    }
}

impl SimulatorSection {
    pub fn to_simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            tick_period: self.tick_period,
            pitch_seed: self.pitch_seed,
        }
    }
}

/// Utterance parameters handed to the speech-output driver
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP 47 language tag
    pub lang: String,
    /// Speaking rate (1.0 = normal)
    pub rate: f32,
    /// Voice pitch (1.0 = normal)
    pub pitch: f32,
    /// Output volume [0.0 - 1.0]
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            lang: "tr-TR".into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> AivaResult<()> {
        if self.lang.trim().is_empty() {
            return Err(AivaError::InvalidConfig("speech.lang is empty".into()));
        }
        if !(0.1..=10.0).contains(&self.rate) {
            return Err(AivaError::InvalidConfig(format!(
                "speech.rate {} outside [0.1, 10]",
                self.rate
            )));
        }
        if !(0.0..=2.0).contains(&self.pitch) {
            return Err(AivaError::InvalidConfig(format!(
                "speech.pitch {} outside [0, 2]",
                self.pitch
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(AivaError::InvalidConfig(format!(
                "speech.volume {} outside [0, 1]",
                self.volume
            )));
        }
        Ok(())
    }
}

/// Logging section
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Complete configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AivaConfig {
    pub simulator: SimulatorSection,
    pub speech: SpeechConfig,
    pub rig: RigConfig,
    pub logging: LoggingConfig,
}

impl AivaConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> AivaResult<Self> {
        let config: AivaConfig =
            serde_json::from_str(json).map_err(|e| AivaError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> AivaResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AivaError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> AivaResult<()> {
        self.simulator.to_simulator_config().validate()?;
        self.speech.validate()
    }

    /// Apply `AIVA_*` environment variables
    pub fn apply_env_overrides(&mut self) -> AivaResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AivaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("AIVA_TICK_PERIOD") {
            self.simulator.tick_period = humantime::parse_duration(raw.trim()).map_err(|e| {
                AivaError::InvalidConfig(format!("AIVA_TICK_PERIOD={}: {}", raw, e))
            })?;
        }
        if let Some(raw) = lookup("AIVA_PITCH_SEED") {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                AivaError::InvalidConfig(format!("AIVA_PITCH_SEED={}: {}", raw, e))
            })?;
            self.simulator.pitch_seed = Some(seed);
        }
        if let Some(lang) = lookup("AIVA_SPEECH_LANG") {
            self.speech.lang = lang;
        }
        if let Some(level) = lookup("AIVA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(raw) = lookup("AIVA_LOG_JSON") {
            self.logging.json = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AivaConfig::default();
        assert_eq!(config.simulator.tick_period, Duration::from_millis(50));
        assert_eq!(config.speech.lang, "tr-TR");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = AivaConfig::from_json_str(
            r#"{
                "simulator": { "tick_period": "40ms", "pitch_seed": 9 },
                "speech": { "lang": "en-US", "rate": 1.2 },
                "rig": { "jaw_keywords": ["mandible"] },
                "logging": { "json": true }
            }"#,
        )
        .unwrap();

        assert_eq!(config.simulator.tick_period, Duration::from_millis(40));
        assert_eq!(config.simulator.pitch_seed, Some(9));
        assert_eq!(config.speech.lang, "en-US");
        assert_eq!(config.speech.rate, 1.2);
        assert_eq!(config.speech.volume, 1.0);
        assert_eq!(config.rig.jaw_keywords, vec!["mandible".to_string()]);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            AivaConfig::from_json_str("{ not json"),
            Err(AivaError::ConfigParse(_))
        ));
        assert!(matches!(
            AivaConfig::from_json_str(r#"{ "simulator": { "tick_period": "soon" } }"#),
            Err(AivaError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AivaConfig::from_json_str(r#"{ "simulator": { "tick_period": "0s" } }"#),
            Err(AivaError::InvalidConfig(_))
        ));
        assert!(matches!(
            AivaConfig::from_json_str(r#"{ "speech": { "volume": 1.5 } }"#),
            Err(AivaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AIVA_TICK_PERIOD", "25ms"),
            ("AIVA_PITCH_SEED", "11"),
            ("AIVA_SPEECH_LANG", "de-DE"),
            ("AIVA_LOG_JSON", "TRUE"),
        ]
        .into_iter()
        .collect();

        let mut config = AivaConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.simulator.tick_period, Duration::from_millis(25));
        assert_eq!(config.simulator.pitch_seed, Some(11));
        assert_eq!(config.speech.lang, "de-DE");
        assert!(config.logging.json);
    }

    #[test]
    fn test_bad_override() {
        let mut config = AivaConfig::default();
        let result = config.apply_overrides(|k| (k == "AIVA_PITCH_SEED").then(|| "x".to_string()));
        assert!(matches!(result, Err(AivaError::InvalidConfig(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("AIVA_TICK_PERIOD", "75ms");
        std::env::set_var("AIVA_LOG_LEVEL", "debug");

        let mut config = AivaConfig::default();
        let result = config.apply_env_overrides();

        std::env::remove_var("AIVA_TICK_PERIOD");
        std::env::remove_var("AIVA_LOG_LEVEL");

        result.unwrap();
        assert_eq!(config.simulator.tick_period, Duration::from_millis(75));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    #[serial]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("aiva-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "speech": { "lang": "en-GB" } }"#).unwrap();

        let config = AivaConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap().speech.lang, "en-GB");

        assert!(matches!(
            AivaConfig::load(std::env::temp_dir().join("aiva-missing-config.json")),
            Err(AivaError::ConfigIo(_))
        ));
    }
}
