//! Speaker - drives a speech-output engine and keeps the mouth in step
//!
//! The speech-output driver owns real audio. It reports its lifecycle on a
//! channel; the speaker's pump task turns `Started` into a simulator start
//! and `Ended`/`Failed` into a stop. Events for a superseded utterance are
//! dropped, so a late `Ended` from a cancelled utterance cannot close the
//! mouth of the current one.

use std::sync::Arc;
use std::time::Duration;

use aiva_core::{AivaError, AivaResult, UtteranceId};
use aiva_voice::VisemeSimulator;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::SpeechConfig;

/// Text plus voice parameters for one utterance
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(id: UtteranceId, text: impl Into<String>, config: &SpeechConfig) -> Self {
        Self {
            id,
            text: text.into(),
            lang: config.lang.clone(),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        }
    }
}

/// Lifecycle report from a speech-output driver
#[derive(Clone, Debug, PartialEq)]
pub enum SpeechOutputEvent {
    Started(UtteranceId),
    Ended(UtteranceId),
    Failed(UtteranceId, String),
}

pub type SpeechEventSender = mpsc::UnboundedSender<SpeechOutputEvent>;

/// Speech-output driver (browser speech synthesis, a TTS engine, ...)
pub trait SpeechOutput: Send + Sync {
    /// Can this output synthesize speech at all?
    fn is_supported(&self) -> bool {
        true
    }

    /// Begin speaking; lifecycle events go to `events`
    fn speak(&self, utterance: &Utterance, events: SpeechEventSender) -> AivaResult<()>;

    /// Drop whatever is being spoken
    fn cancel(&self);
}

/// Speaker counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeakerStats {
    pub utterances: u64,
    pub interrupted: u64,
    pub failed: u64,
    pub stale_events: u64,
}

#[derive(Default)]
struct SpeakerState {
    current: Option<(UtteranceId, String)>,
    last: UtteranceId,
    stats: SpeakerStats,
}

/// Couples a [`SpeechOutput`] with a [`VisemeSimulator`]
pub struct Speaker {
    output: Arc<dyn SpeechOutput>,
    simulator: VisemeSimulator,
    config: SpeechConfig,
    state: Arc<Mutex<SpeakerState>>,
    events: SpeechEventSender,
    pump: JoinHandle<()>,
}

impl Speaker {
    /// Must be called from within a Tokio runtime
    pub fn new(
        output: Arc<dyn SpeechOutput>,
        simulator: VisemeSimulator,
        config: SpeechConfig,
    ) -> Self {
        let (events, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SpeakerState::default()));
        let pump = tokio::spawn(pump(rx, Arc::clone(&state), simulator.clone()));

        Self {
            output,
            simulator,
            config,
            state,
            events,
            pump,
        }
    }

    /// Speak `text`, interrupting anything in progress.
    ///
    /// Empty text is ignored and returns `Ok(None)`.
    pub fn speak(&self, text: &str) -> AivaResult<Option<UtteranceId>> {
        if text.is_empty() {
            return Ok(None);
        }
        if !self.output.is_supported() {
            warn!("speech output does not support synthesis");
            return Err(AivaError::SpeechUnsupported);
        }

        let (utterance, interrupted) = {
            let mut state = self.state.lock();
            let interrupted = state.current.take().is_some();
            if interrupted {
                state.stats.interrupted += 1;
            }

            let id = state.last.next();
            state.last = id;
            state.current = Some((id, text.to_string()));
            state.stats.utterances += 1;
            (Utterance::new(id, text, &self.config), interrupted)
        };

        // Observers of the simulator may read speaker state: no lock held here
        if interrupted {
            self.output.cancel();
        }
        self.simulator.stop();

        debug!(utterance = %utterance.id, lang = %utterance.lang, "speaking");
        if let Err(e) = self.output.speak(&utterance, self.events.clone()) {
            let mut state = self.state.lock();
            if state.current.as_ref().map(|(id, _)| *id) == Some(utterance.id) {
                state.current = None;
            }
            state.stats.failed += 1;
            warn!(utterance = %utterance.id, error = %e, "speech output refused utterance");
            return Err(e);
        }

        Ok(Some(utterance.id))
    }

    /// Interrupt the current utterance, if any
    pub fn cancel(&self) -> bool {
        let had = {
            let mut state = self.state.lock();
            let had = state.current.take().is_some();
            if had {
                state.stats.interrupted += 1;
            }
            had
        };
        if had {
            self.output.cancel();
        }
        self.simulator.stop();
        had
    }

    /// Is the mouth moving?
    pub fn is_speaking(&self) -> bool {
        self.simulator.is_active()
    }

    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.state.lock().current.as_ref().map(|(id, _)| *id)
    }

    pub fn simulator(&self) -> &VisemeSimulator {
        &self.simulator
    }

    pub fn stats(&self) -> SpeakerStats {
        self.state.lock().stats.clone()
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump(
    mut rx: mpsc::UnboundedReceiver<SpeechOutputEvent>,
    state: Arc<Mutex<SpeakerState>>,
    simulator: VisemeSimulator,
) {
    while let Some(event) = rx.recv().await {
        handle_event(&event, &state, &simulator);
    }
}

/// What the pump does with the simulator once the state lock is released
enum PumpAction {
    Start(UtteranceId, String),
    Stop,
    Ignore,
}

fn handle_event(
    event: &SpeechOutputEvent,
    state: &Mutex<SpeakerState>,
    simulator: &VisemeSimulator,
) {
    let action = {
        let mut state = state.lock();
        let current = state.current.as_ref().map(|(id, _)| *id);

        match event {
            SpeechOutputEvent::Started(id) if current == Some(*id) => match &state.current {
                Some((_, text)) => PumpAction::Start(*id, text.clone()),
                None => PumpAction::Ignore,
            },
            SpeechOutputEvent::Ended(id) if current == Some(*id) => {
                state.current = None;
                PumpAction::Stop
            }
            SpeechOutputEvent::Failed(id, reason) if current == Some(*id) => {
                warn!(utterance = %id, %reason, "speech output failed");
                state.current = None;
                state.stats.failed += 1;
                PumpAction::Stop
            }
            _ => {
                debug!(?event, "ignoring event for superseded utterance");
                state.stats.stale_events += 1;
                PumpAction::Ignore
            }
        }
    };

    match action {
        PumpAction::Start(id, text) => {
            simulator.start(&text);
            // A newer `speak` may have landed between the lock and the start
            let still_current = state.lock().current.as_ref().map(|(c, _)| *c) == Some(id);
            if !still_current {
                simulator.stop();
            }
        }
        PumpAction::Stop => {
            simulator.stop();
        }
        PumpAction::Ignore => {}
    }
}

/// In-process speech output that "speaks" for a fixed time per character.
///
/// Reports `Started` at once and `Ended` after the text's duration;
/// cancellation reports `Failed(.., "interrupted")`.
pub struct TimedSpeechOutput {
    per_char: Duration,
    supported: bool,
    active: Mutex<Option<CancellationToken>>,
}

impl TimedSpeechOutput {
    pub fn new(per_char: Duration) -> Self {
        Self {
            per_char,
            supported: true,
            active: Mutex::new(None),
        }
    }

    /// An output that reports no synthesis support
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(Duration::ZERO)
        }
    }

    /// Time this output spends on `text`
    pub fn duration_of(&self, text: &str) -> Duration {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        self.per_char.saturating_mul(chars)
    }
}

impl SpeechOutput for TimedSpeechOutput {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn speak(&self, utterance: &Utterance, events: SpeechEventSender) -> AivaResult<()> {
        if !self.supported {
            return Err(AivaError::SpeechUnsupported);
        }

        let token = CancellationToken::new();
        if let Some(previous) = self.active.lock().replace(token.clone()) {
            previous.cancel();
        }

        let id = utterance.id;
        let duration = self.duration_of(&utterance.text);
        events
            .send(SpeechOutputEvent::Started(id))
            .map_err(|e| AivaError::SpeechOutput(e.to_string()))?;

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => SpeechOutputEvent::Failed(id, "interrupted".into()),
                _ = tokio::time::sleep(duration) => SpeechOutputEvent::Ended(id),
            };
            // Receiver gone means the speaker is gone
            let _ = events.send(outcome);
        });

        Ok(())
    }

    fn cancel(&self) {
        if let Some(token) = self.active.lock().take() {
            token.cancel();
        }
    }
}
