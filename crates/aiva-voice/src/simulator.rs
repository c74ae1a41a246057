//! Viseme Simulator - drives a session on a fixed cadence
//!
//! The simulator is a cheap, cloneable handle. Every clone talks to the same
//! session, event bus and sample observable, so the composing application can
//! hand one to the speech driver and one to the renderer.
//!
//! Each session owns a tick task and a cancellation token. All publishing
//! happens under one (reentrant) publish lock and the token is checked under
//! it, so once `stop()` or a superseding `start()` returns, the old session
//! can no longer publish anything.

use std::sync::{Arc, Weak};
use std::time::Duration;

use aiva_core::{AivaResult, EndReason, Sample, SessionId, SpeechEvent, SpeechEventKind};
use parking_lot::{Mutex, ReentrantMutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    EventBus, PitchSource, RandomPitch, SimulationSession, SimulatorConfig, Subscription, Tick,
};

/// Simulator counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulatorStats {
    pub sessions_started: u64,
    pub sessions_completed: u64,
    pub sessions_stopped: u64,
    pub sessions_superseded: u64,
    pub samples_published: u64,
    pub ignored_starts: u64,
}

/// A session with its timer
struct Running {
    session: SimulationSession,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Running {
    /// Cancel the timer; returns where the session stood
    fn cancel(self) -> (SessionId, usize) {
        self.cancel.cancel();
        self.task.abort();
        (self.session.id(), self.session.cursor())
    }
}

struct SimState {
    running: Option<Running>,
    last_session: SessionId,
    pitch: Box<dyn PitchSource>,
    stats: SimulatorStats,
}

enum TickOutcome {
    Sample { cursor: usize, sample: Sample },
    Finished { cursor: usize },
}

struct Inner {
    config: SimulatorConfig,
    /// Serializes publication; reentrant so observers may call back in
    publish: ReentrantMutex<()>,
    state: Mutex<SimState>,
    current: watch::Sender<Sample>,
    bus: EventBus,
}

impl Inner {
    /// One tick of session `id`. Returns false once the task should exit.
    fn tick(&self, id: SessionId, cancel: &CancellationToken) -> bool {
        let _publish = self.publish.lock();

        let outcome = {
            let mut state = self.state.lock();
            if cancel.is_cancelled() {
                return false;
            }

            let SimState {
                running,
                pitch,
                stats,
                ..
            } = &mut *state;

            let Some(run) = running.as_mut().filter(|r| r.session.id() == id) else {
                return false;
            };

            match run.session.tick(&mut **pitch) {
                Tick::Sample { cursor, sample } => {
                    stats.samples_published += 1;
                    TickOutcome::Sample { cursor, sample }
                }
                Tick::Finished => {
                    let cursor = run.session.cursor();
                    *running = None;
                    stats.sessions_completed += 1;
                    TickOutcome::Finished { cursor }
                }
            }
        };

        match outcome {
            TickOutcome::Sample { cursor, sample } => {
                trace!(session = %id, cursor, volume = sample.volume, "viseme sample");
                self.current.send_replace(sample);
                self.bus.publish(&SpeechEvent::Sample {
                    session: id,
                    cursor,
                    sample,
                });
                true
            }
            TickOutcome::Finished { cursor } => {
                self.finish(id, cursor, EndReason::Completed);
                false
            }
        }
    }

    /// Publish the silent sample and the end notification.
    /// Caller holds the publish lock.
    fn finish(&self, id: SessionId, cursor: usize, reason: EndReason) {
        self.current.send_replace(Sample::SILENT);
        self.bus.publish(&SpeechEvent::Sample {
            session: id,
            cursor,
            sample: Sample::SILENT,
        });
        debug!(session = %id, cursor, ?reason, "speech ended");
        self.bus.publish(&SpeechEvent::Ended {
            session: id,
            reason,
        });
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(run) = self.state.get_mut().running.take() {
            run.cancel();
        }
    }
}

/// Recurring tick for one session
async fn drive(inner: Weak<Inner>, id: SessionId, cancel: CancellationToken, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let Some(inner) = inner.upgrade() else {
            break;
        };
        if !inner.tick(id, &cancel) {
            break;
        }
    }
}

/// Text-driven mouth animation source
#[derive(Clone)]
pub struct VisemeSimulator {
    inner: Arc<Inner>,
}

impl VisemeSimulator {
    /// Create a simulator; the pitch cue is random (seeded if configured)
    pub fn new(config: SimulatorConfig) -> AivaResult<Self> {
        let pitch: Box<dyn PitchSource> = match config.pitch_seed {
            Some(seed) => Box::new(RandomPitch::seeded(seed)),
            None => Box::new(RandomPitch::new()),
        };
        Self::with_pitch_source(config, pitch)
    }

    /// Create a simulator with a custom pitch cue source
    pub fn with_pitch_source(
        config: SimulatorConfig,
        pitch: Box<dyn PitchSource>,
    ) -> AivaResult<Self> {
        config.validate()?;
        let (current, _) = watch::channel(Sample::SILENT);

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                publish: ReentrantMutex::new(()),
                state: Mutex::new(SimState {
                    running: None,
                    last_session: SessionId::ZERO,
                    pitch,
                    stats: SimulatorStats::default(),
                }),
                current,
                bus: EventBus::new(),
            }),
        })
    }

    /// Start animating `text`, superseding any running session.
    ///
    /// Empty text is ignored and returns `None`. Must be called from within
    /// a Tokio runtime.
    pub fn start(&self, text: &str) -> Option<SessionId> {
        if text.is_empty() {
            self.inner.state.lock().stats.ignored_starts += 1;
            debug!("ignoring empty utterance");
            return None;
        }

        let _publish = self.inner.publish.lock();

        let (superseded, id, chars) = {
            let mut state = self.inner.state.lock();
            let superseded = state.running.take().map(Running::cancel);
            if superseded.is_some() {
                state.stats.sessions_superseded += 1;
            }

            let id = state.last_session.next();
            state.last_session = id;

            let session = SimulationSession::new(id, text);
            let chars = session.len();
            let cancel = CancellationToken::new();
            let task = tokio::spawn(drive(
                Arc::downgrade(&self.inner),
                id,
                cancel.clone(),
                self.inner.config.tick_period,
            ));

            state.running = Some(Running {
                session,
                cancel,
                task,
            });
            state.stats.sessions_started += 1;
            (superseded, id, chars)
        };

        if let Some((old, cursor)) = superseded {
            self.inner.finish(old, cursor, EndReason::Superseded);
        }

        debug!(session = %id, chars, "speech started");
        self.inner.bus.publish(&SpeechEvent::Started {
            session: id,
            text: text.to_string(),
        });

        Some(id)
    }

    /// Stop the running session, if any. Returns whether one was stopped.
    pub fn stop(&self) -> bool {
        let _publish = self.inner.publish.lock();

        let stopped = {
            let mut state = self.inner.state.lock();
            let stopped = state.running.take().map(Running::cancel);
            if stopped.is_some() {
                state.stats.sessions_stopped += 1;
            }
            stopped
        };

        match stopped {
            Some((id, cursor)) => {
                self.inner.finish(id, cursor, EndReason::Stopped);
                true
            }
            None => false,
        }
    }

    /// Latest published sample
    pub fn current_sample(&self) -> Sample {
        *self.inner.current.borrow()
    }

    /// Observe samples asynchronously
    pub fn watch(&self) -> watch::Receiver<Sample> {
        self.inner.current.subscribe()
    }

    /// Is a session running?
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().running.is_some()
    }

    /// Id of the running session
    pub fn session_id(&self) -> Option<SessionId> {
        self.inner
            .state
            .lock()
            .running
            .as_ref()
            .map(|r| r.session.id())
    }

    /// Cursor of the running session
    pub fn cursor(&self) -> Option<usize> {
        self.inner
            .state
            .lock()
            .running
            .as_ref()
            .map(|r| r.session.cursor())
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SpeechEvent) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(callback)
    }

    pub fn subscribe_kind<F>(&self, kind: SpeechEventKind, callback: F) -> Subscription
    where
        F: Fn(&SpeechEvent) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe_kind(kind, callback)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.inner.config
    }

    pub fn stats(&self) -> SimulatorStats {
        self.inner.state.lock().stats.clone()
    }
}

impl std::fmt::Debug for VisemeSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisemeSimulator")
            .field("config", &self.inner.config)
            .field("session", &self.session_id())
            .field("current", &self.current_sample())
            .finish()
    }
}
