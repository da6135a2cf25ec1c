//! Event Bus Module
//!
//! Per-cache ordered queue between mutating callers and the dispatch worker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::events::{CacheEvent, CacheEventListener};

/// Event tagged with its publication sequence number.
#[derive(Debug)]
pub struct Dispatch<K, V> {
    pub sequence: u64,
    pub event: CacheEvent<K, V>,
}

/// A listener and the first sequence number it may observe.
pub struct Registration<K, V> {
    pub listener: Arc<dyn CacheEventListener<K, V>>,
    pub from_sequence: u64,
}

impl<K, V> Clone for Registration<K, V> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            from_sequence: self.from_sequence,
        }
    }
}

/// Listener registry shared by the bus and its dispatch worker.
pub type Listeners<K, V> = Arc<RwLock<Vec<Registration<K, V>>>>;

// == Event Bus ==
/// Publishing half of a cache's event stream.
///
/// `publish` never blocks: the queue is bounded and a full queue drops the
/// event, counting it in [`EventBus::dropped_events`].
pub struct EventBus<K, V> {
    alias: String,
    sender: mpsc::Sender<Dispatch<K, V>>,
    listeners: Listeners<K, V>,
    sequence: AtomicU64,
    dropped: AtomicU64,
}

impl<K, V> EventBus<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    // == Constructor ==
    /// Creates the bus and the receiving end for its dispatch worker.
    pub fn new(
        alias: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Dispatch<K, V>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let bus = Self {
            alias: alias.into(),
            sender,
            listeners: Arc::new(RwLock::new(Vec::new())),
            sequence: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        };
        (bus, receiver)
    }

    pub fn listeners(&self) -> Listeners<K, V> {
        Arc::clone(&self.listeners)
    }

    // == Subscribe ==
    /// Registers a listener for every event published from now on.
    pub fn subscribe(&self, listener: Arc<dyn CacheEventListener<K, V>>) {
        let mut listeners = self.listeners.write();
        let from_sequence = self.sequence.load(Ordering::SeqCst);
        listeners.push(Registration {
            listener,
            from_sequence,
        });
        debug!(
            "Listener registered on '{}' from sequence {}",
            self.alias, from_sequence
        );
    }

    // == Publish ==
    /// Enqueues an event for the dispatch worker.
    pub fn publish(&self, event: CacheEvent<K, V>) {
        if self.listeners.read().is_empty() {
            return;
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        match self.sender.try_send(Dispatch { sequence, event }) {
            Ok(()) => {}
            Err(TrySendError::Full(dispatch)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    "Event queue of '{}' is full, dropped {} event (sequence {}, {} dropped so far)",
                    self.alias,
                    dispatch.event.event_type(),
                    sequence,
                    dropped
                );
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Event dispatch for '{}' has stopped, event discarded", self.alias);
            }
        }
    }

    /// Number of events lost to a full queue.
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
