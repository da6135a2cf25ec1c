//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for capacity eviction.

use std::collections::BTreeMap;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every access stamps a key with a fresh, strictly increasing tick:
/// - Lowest tick = Least recently used
/// - Highest tick = Most recently used
///
/// Callers keep the current tick next to the entry and hand it back on
/// `refresh`/`forget`, so every operation is O(log n).
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Keys by access tick
    order: BTreeMap<u64, K>,
    /// Next tick to hand out
    next_tick: u64,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            next_tick: 0,
        }
    }

    // == Record ==
    /// Starts tracking a key as the most recently used one.
    ///
    /// Returns the tick the caller must store alongside the entry.
    pub fn record(&mut self, key: K) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        self.order.insert(tick, key);
        tick
    }

    // == Refresh ==
    /// Marks a key as recently used (moves it to the hot end).
    pub fn refresh(&mut self, old_tick: u64, key: K) -> u64 {
        self.order.remove(&old_tick);
        self.record(key)
    }

    // == Forget ==
    /// Stops tracking whatever key holds `tick`. Unknown ticks are ignored.
    pub fn forget(&mut self, tick: u64) {
        self.order.remove(&tick);
    }

    // == Pop Oldest ==
    /// Returns and removes the least recently used key with its tick.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<(u64, K)> {
        self.order.pop_first()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
