//! Simulation session - the per-utterance cursor over the text
//!
//! The session is pure: it knows nothing about timers or observers. The
//! simulator drives it one tick at a time.

use aiva_core::{Sample, SessionId};

use crate::PitchSource;

/// Outcome of a single tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// A character was consumed
    Sample { cursor: usize, sample: Sample },
    /// The cursor had already reached the end; the session is now inactive
    Finished,
}

/// One utterance being animated
///
/// INVARIANT: `cursor` never decreases and stays within `[0, len]`.
#[derive(Clone, Debug)]
pub struct SimulationSession {
    id: SessionId,
    chars: Vec<char>,
    cursor: usize,
}

impl SimulationSession {
    /// Create a session over the lowercased text
    pub fn new(id: SessionId, text: &str) -> Self {
        Self {
            id,
            chars: text.to_lowercase().chars().collect(),
            cursor: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Number of characters (and of non-silent samples)
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advance by one tick. Once the text is exhausted every tick is `Finished`.
    pub fn tick(&mut self, pitch: &mut dyn PitchSource) -> Tick {
        match self.chars.get(self.cursor) {
            Some(&ch) => {
                let cursor = self.cursor;
                let sample = Sample::for_char(ch, pitch.next_pitch());
                self.cursor += 1;
                Tick::Sample { cursor, sample }
            }
            None => Tick::Finished,
        }
    }
}
