//! Event Dispatch Worker
//!
//! Drains a cache's event queue in order and hands each event to every
//! listener before moving on to the next one.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::events::{Dispatch, Listeners};

/// Spawns the dispatch worker for one cache.
///
/// A failing or panicking listener is logged and skipped; delivery continues
/// with the next listener and the next event. On shutdown the worker
/// delivers whatever is already queued, then exits.
pub fn spawn_dispatch_worker<K, V>(
    alias: String,
    mut events: mpsc::Receiver<Dispatch<K, V>>,
    listeners: Listeners<K, V>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting event dispatch for '{}'", alias);

        loop {
            tokio::select! {
                biased;
                next = events.recv() => match next {
                    Some(dispatch) => deliver(&alias, &listeners, &dispatch),
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        let mut drained = 0usize;
                        while let Ok(dispatch) = events.try_recv() {
                            deliver(&alias, &listeners, &dispatch);
                            drained += 1;
                        }
                        debug!("Delivered {} queued events of '{}' before stopping", drained, alias);
                        break;
                    }
                }
            }
        }

        info!("Event dispatch for '{}' stopped", alias);
    })
}

fn deliver<K, V>(alias: &str, listeners: &Listeners<K, V>, dispatch: &Dispatch<K, V>) {
    // Snapshot so listeners can register more listeners without deadlocking.
    let registrations = listeners.read().clone();

    for registration in registrations
        .iter()
        .filter(|r| dispatch.sequence >= r.from_sequence)
    {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            registration.listener.on_event(&dispatch.event)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(
                "Listener on '{}' failed on {} event (sequence {}): {:#}",
                alias,
                dispatch.event.event_type(),
                dispatch.sequence,
                err
            ),
            Err(_) => error!(
                "Listener on '{}' panicked on {} event (sequence {})",
                alias,
                dispatch.event.event_type(),
                dispatch.sequence
            ),
        }
    }
}
