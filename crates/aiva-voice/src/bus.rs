//! Speech event bus - typed publish/subscribe owned by the simulator
//!
//! Subscribing returns a [`Subscription`]; dropping it (or calling
//! [`Subscription::unsubscribe`]) removes the callback. Callbacks run on
//! the publishing task, outside of the subscriber lock, so a callback may
//! subscribe, unsubscribe or drive the simulator itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use aiva_core::{SpeechEvent, SpeechEventKind};
use parking_lot::RwLock;

type Callback = Arc<dyn Fn(&SpeechEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    filter: Option<SpeechEventKind>,
    callback: Callback,
}

#[derive(Default)]
struct BusInner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl BusInner {
    fn remove(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }
}

/// Event bus for [`SpeechEvent`]s
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SpeechEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(callback))
    }

    /// Receive only events of one kind
    pub fn subscribe_kind<F>(&self, kind: SpeechEventKind, callback: F) -> Subscription
    where
        F: Fn(&SpeechEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(callback))
    }

    fn register(&self, filter: Option<SpeechEventKind>, callback: Callback) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.write().push(Subscriber {
            id,
            filter,
            callback,
        });
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every matching subscriber
    pub fn publish(&self, event: &SpeechEvent) {
        let kind = event.kind();
        let targets: Vec<Callback> = self
            .inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.filter.map_or(true, |f| f == kind))
            .map(|s| Arc::clone(&s.callback))
            .collect();

        for callback in targets {
            callback(event);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle to a registered callback
#[must_use = "dropping a Subscription unsubscribes it"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Remove the callback now
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Is the callback still registered?
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .map(|bus| bus.subscribers.read().iter().any(|s| s.id == self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}
