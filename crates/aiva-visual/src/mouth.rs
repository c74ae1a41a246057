//! Mouth State - mouth shape derived from speech samples

use aiva_core::{PhonemeClass, Sample};

/// Viseme - mouth shapes for speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viseme {
    #[default]
    Neutral,    // Closed/neutral
    AA,         // "a" as in "araba"
    EH,         // "e" as in "elma"
    IY,         // "i" as in "iyi"
    OW,         // "o", "ö"
    UW,         // "u", "ü"
    PP,         // "p", "b", "m" (lips together)
    FF,         // "f", "v" (teeth on lip)
    SS,         // "s", "z", "ş" (teeth together)
    CH,         // "ç", "c", "j" (lips forward)
    DD,         // "d", "t", "n", "l" (tongue on ridge)
    KK,         // "k", "g" (back of tongue)
    RR,         // "r"
}

impl Viseme {
    /// Mouth shape for a sample's character (`None` is silence)
    pub fn from_phoneme_class(ch: Option<char>) -> Self {
        let Some(ch) = ch else {
            return Viseme::Neutral;
        };

        match ch {
            'r' => return Viseme::RR,
            'l' => return Viseme::DD,
            'ç' | 'c' | 'j' => return Viseme::CH,
            'y' => return Viseme::IY,
            _ => {}
        }

        match PhonemeClass::classify(ch) {
            Some(PhonemeClass::OpenVowel) => Viseme::AA,
            Some(PhonemeClass::MidVowel) => Viseme::EH,
            Some(PhonemeClass::CloseVowel) => Viseme::IY,
            Some(PhonemeClass::RoundedVowel) => Viseme::OW,
            Some(PhonemeClass::CloseRoundedVowel) => Viseme::UW,
            Some(PhonemeClass::Bilabial) => Viseme::PP,
            Some(PhonemeClass::Labiodental) => Viseme::FF,
            Some(PhonemeClass::Sibilant) => Viseme::SS,
            Some(PhonemeClass::Alveolar) => Viseme::DD,
            Some(PhonemeClass::Velar) => Viseme::KK,
            Some(PhonemeClass::TongueTip) => Viseme::RR,
            Some(PhonemeClass::Glottal) => Viseme::AA,
            Some(PhonemeClass::Palatal) => Viseme::IY,
            Some(PhonemeClass::Space) | None => Viseme::Neutral,
        }
    }

    /// Lips touch for this shape
    pub fn is_closed(self) -> bool {
        matches!(self, Viseme::Neutral | Viseme::PP)
    }
}

/// Mouth state for speech visualization
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouthState {
    /// Mouth openness (0.0 = closed, 1.0 = fully open)
    pub openness: f32,
    /// Smile amount (-1.0 = frown, 0.0 = neutral, 1.0 = smile)
    pub smile: f32,
    /// Current viseme (mouth shape for speech)
    pub viseme: Viseme,
}

impl MouthState {
    /// Closed, neutral mouth
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            openness: sample.volume.clamp(0.0, 1.0),
            smile: 0.0,
            viseme: Viseme::from_phoneme_class(sample.phoneme_class),
        }
    }

    /// Interpolate between two mouth states
    pub fn lerp(&self, other: &MouthState, t: f32) -> MouthState {
        let t = t.clamp(0.0, 1.0);
        MouthState {
            openness: self.openness + (other.openness - self.openness) * t,
            smile: self.smile + (other.smile - self.smile) * t,
            viseme: if t < 0.5 { self.viseme } else { other.viseme },
        }
    }
}
