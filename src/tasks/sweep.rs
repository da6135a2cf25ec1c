//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, so expiry
//! events are delivered even for keys nobody reads again.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Something the sweep task can purge.
pub trait Sweepable: Send + Sync + 'static {
    fn alias(&self) -> &str;

    /// Removes every stale entry, returning how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Spawns a background task that periodically purges expired entries.
///
/// The task holds only a weak reference to its target and exits when the
/// target is dropped or when `shutdown` flips to `true`.
///
/// # Returns
/// A JoinHandle the owner awaits after signalling shutdown.
pub fn spawn_sweep_task<T: Sweepable>(
    target: Weak<T>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let alias = match target.upgrade() {
            Some(target) => target.alias().to_string(),
            None => return,
        };
        info!(
            "Starting TTL sweep for '{}' with interval of {:?}",
            alias, interval
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let Some(target) = target.upgrade() else {
                break;
            };
            let removed = target.purge_expired();
            drop(target);

            if removed > 0 {
                info!("TTL sweep of '{}': removed {} expired entries", alias, removed);
            } else {
                debug!("TTL sweep of '{}': no expired entries found", alias);
            }
        }

        info!("TTL sweep for '{}' stopped", alias);
    })
}
