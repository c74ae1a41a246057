//! Speech event definitions
//!
//! Events are what the simulator tells its observers: a session started,
//! a sample was produced, a session ended.

use crate::{Sample, SessionId};

/// Speech event kind, used for filtered subscriptions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeechEventKind {
    Started,
    Sample,
    Ended,
}

/// Why a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// Every character was emitted
    Completed,
    /// `stop()` was called
    Stopped,
    /// A newer `start()` took over
    Superseded,
}

/// Notification published by the simulator
#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    /// A session began; published before its first sample
    Started { session: SessionId, text: String },
    /// A per-character sample was published
    Sample {
        session: SessionId,
        /// Position of the character in the lowercased text
        cursor: usize,
        sample: Sample,
    },
    /// A session finished; the terminal silent sample is already published
    Ended { session: SessionId, reason: EndReason },
}

impl SpeechEvent {
    #[inline]
    pub fn kind(&self) -> SpeechEventKind {
        match self {
            SpeechEvent::Started { .. } => SpeechEventKind::Started,
            SpeechEvent::Sample { .. } => SpeechEventKind::Sample,
            SpeechEvent::Ended { .. } => SpeechEventKind::Ended,
        }
    }

    #[inline]
    pub fn session(&self) -> SessionId {
        match self {
            SpeechEvent::Started { session, .. }
            | SpeechEvent::Sample { session, .. }
            | SpeechEvent::Ended { session, .. } => *session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        let session = SessionId::new(3);
        let started = SpeechEvent::Started {
            session,
            text: "ab".into(),
        };
        let sample = SpeechEvent::Sample {
            session,
            cursor: 0,
            sample: Sample::for_char('a', 0.8),
        };
        let ended = SpeechEvent::Ended {
            session,
            reason: EndReason::Completed,
        };

        assert_eq!(started.kind(), SpeechEventKind::Started);
        assert_eq!(sample.kind(), SpeechEventKind::Sample);
        assert_eq!(ended.kind(), SpeechEventKind::Ended);
        assert_eq!(ended.session(), session);
    }
}
