//! Phoneme classes and the static mouth-openness table
//!
//! The table is calibrated against the avatar mesh; its values must not
//! drift. Classification works on already-lowercased characters.

/// Openness used for any character missing from the table
pub const DEFAULT_OPENNESS: f32 = 0.2;

/// Articulation class of a single (lowercase) character
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhonemeClass {
    /// "a" - wide open
    OpenVowel,
    /// "e" - mid open
    MidVowel,
    /// "i" - slightly open
    CloseVowel,
    /// "o", "ö" - rounded, open
    RoundedVowel,
    /// "u", "ü" - rounded, small opening
    CloseRoundedVowel,
    /// "b", "p", "m" - lips together
    Bilabial,
    /// "f", "v" - lower lip on upper teeth
    Labiodental,
    /// "s", "z", "ş" - teeth together
    Sibilant,
    /// "r", "l", "ç", "c" - tongue tip
    TongueTip,
    /// "t", "d", "n" - tongue on ridge
    Alveolar,
    /// "k", "g" - back of tongue
    Velar,
    /// "h" - breath
    Glottal,
    /// "y", "j" - middle of tongue
    Palatal,
    /// " " - pause between words
    Space,
}

impl PhonemeClass {
    pub const ALL: [PhonemeClass; 14] = [
        PhonemeClass::OpenVowel,
        PhonemeClass::MidVowel,
        PhonemeClass::CloseVowel,
        PhonemeClass::RoundedVowel,
        PhonemeClass::CloseRoundedVowel,
        PhonemeClass::Bilabial,
        PhonemeClass::Labiodental,
        PhonemeClass::Sibilant,
        PhonemeClass::TongueTip,
        PhonemeClass::Alveolar,
        PhonemeClass::Velar,
        PhonemeClass::Glottal,
        PhonemeClass::Palatal,
        PhonemeClass::Space,
    ];

    /// Classify a lowercase character. Returns `None` for unmapped input,
    /// including uppercase letters, digits and punctuation.
    pub fn classify(ch: char) -> Option<Self> {
        match ch {
            'a' => Some(PhonemeClass::OpenVowel),
            'e' => Some(PhonemeClass::MidVowel),
            'i' => Some(PhonemeClass::CloseVowel),
            'o' | 'ö' => Some(PhonemeClass::RoundedVowel),
            'u' | 'ü' => Some(PhonemeClass::CloseRoundedVowel),
            'b' | 'p' | 'm' => Some(PhonemeClass::Bilabial),
            'f' | 'v' => Some(PhonemeClass::Labiodental),
            's' | 'z' | 'ş' => Some(PhonemeClass::Sibilant),
            'r' | 'l' | 'ç' | 'c' => Some(PhonemeClass::TongueTip),
            't' | 'd' | 'n' => Some(PhonemeClass::Alveolar),
            'k' | 'g' => Some(PhonemeClass::Velar),
            'h' => Some(PhonemeClass::Glottal),
            'y' | 'j' => Some(PhonemeClass::Palatal),
            ' ' => Some(PhonemeClass::Space),
            _ => None,
        }
    }

    /// Mouth openness for this class, in [0, 1]
    pub fn openness(self) -> f32 {
        match self {
            PhonemeClass::OpenVowel => 0.8,
            PhonemeClass::MidVowel => 0.6,
            PhonemeClass::CloseVowel => 0.3,
            PhonemeClass::RoundedVowel => 0.7,
            PhonemeClass::CloseRoundedVowel => 0.4,
            PhonemeClass::Bilabial => 0.2,
            PhonemeClass::Labiodental => 0.3,
            PhonemeClass::Sibilant => 0.3,
            PhonemeClass::TongueTip => 0.4,
            PhonemeClass::Alveolar => 0.5,
            PhonemeClass::Velar => 0.6,
            PhonemeClass::Glottal => 0.3,
            PhonemeClass::Palatal => 0.3,
            PhonemeClass::Space => 0.1,
        }
    }

    /// Is this a vowel class?
    pub fn is_vowel(self) -> bool {
        matches!(
            self,
            PhonemeClass::OpenVowel
                | PhonemeClass::MidVowel
                | PhonemeClass::CloseVowel
                | PhonemeClass::RoundedVowel
                | PhonemeClass::CloseRoundedVowel
        )
    }
}

/// Table lookup with the default fallback
#[inline]
pub fn openness_of(ch: char) -> f32 {
    PhonemeClass::classify(ch)
        .map(PhonemeClass::openness)
        .unwrap_or(DEFAULT_OPENNESS)
}
