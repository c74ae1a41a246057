//! Mouth samples
//!
//! A sample is the per-tick output of the viseme simulator: how far the
//! mouth is open, a pitch cue, and the character that produced it.

use serde::Serialize;

use crate::openness_of;

/// Lowest pitch cue emitted for a spoken character
pub const PITCH_MIN: f32 = 0.7;
/// Highest pitch cue emitted for a spoken character
pub const PITCH_MAX: f32 = 1.0;

/// One mouth sample
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Sample {
    /// Mouth openness [0.0 - 1.0]
    pub volume: f32,
    /// Pitch cue, [0.7 - 1.0] while speaking, 0.0 when silent
    pub pitch: f32,
    /// Character that produced this sample (`None` for silence)
    pub phoneme_class: Option<char>,
}

impl Sample {
    /// The terminal sample: closed mouth, no pitch, no character
    pub const SILENT: Sample = Sample {
        volume: 0.0,
        pitch: 0.0,
        phoneme_class: None,
    };

    /// Sample for a lowercase character with the given pitch cue
    pub fn for_char(ch: char, pitch: f32) -> Self {
        Sample {
            volume: openness_of(ch),
            pitch,
            phoneme_class: Some(ch),
        }
    }

    /// Is this the closed-mouth silence sample?
    #[inline]
    pub fn is_silent(&self) -> bool {
        self.phoneme_class.is_none() && self.volume == 0.0 && self.pitch == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json() {
        let json = serde_json::to_string(&Sample::for_char('a', 0.9)).unwrap();
        assert_eq!(json, r#"{"volume":0.8,"pitch":0.9,"phoneme_class":"a"}"#);

        let json = serde_json::to_string(&Sample::SILENT).unwrap();
        assert_eq!(json, r#"{"volume":0.0,"pitch":0.0,"phoneme_class":null}"#);
    }

    #[test]
    fn test_silent_sample() {
        assert!(Sample::SILENT.is_silent());
        assert_eq!(Sample::default(), Sample::SILENT);
    }

    #[test]
    fn test_for_char() {
        let s = Sample::for_char('a', 0.85);
        assert_eq!(s.volume, 0.8);
        assert_eq!(s.pitch, 0.85);
        assert_eq!(s.phoneme_class, Some('a'));
        assert!(!s.is_silent());

        let s = Sample::for_char('?', 0.7);
        assert_eq!(s.volume, 0.2);
    }
}
