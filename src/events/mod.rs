//! Events Module
//!
//! Lifecycle events, listeners and the per-cache ordered event bus.

mod bus;
mod event;
mod listener;

pub use bus::{Dispatch, EventBus, Listeners, Registration};
pub use event::{CacheEvent, CacheEventType};
pub use listener::{listener_fn, CacheEventListener, EventLogger, FnListener};
