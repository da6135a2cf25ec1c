//! Background Tasks Module
//!
//! Long-lived per-cache tasks, both stopped through a `watch` shutdown signal.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a fixed period
//! - Event Dispatch: Delivers queued cache events to listeners in order

mod dispatch;
mod sweep;

pub use dispatch::spawn_dispatch_worker;
pub use sweep::{spawn_sweep_task, Sweepable};
