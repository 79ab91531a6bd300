//! Id counters, one per entity type.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

pub const DEVICE: &str = "device";
pub const NETWORK: &str = "network";
pub const DEVICE_CLASS: &str = "device_class";
pub const COMMAND: &str = "command";
pub const NOTIFICATION: &str = "notification";
pub const USER: &str = "user";
pub const ACCESS_KEY: &str = "access_key";

/// The counter namespace.
#[derive(Debug, Default)]
pub struct Counters {
    values: DashMap<&'static str, AtomicI64>,
}

impl Counters {
    /// Take the next id for `name`. Ids start at 1.
    pub fn next(&self, name: &'static str) -> i64 {
        let entry = self.values.entry(name).or_insert_with(|| AtomicI64::new(0));
        entry.value().fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record an externally chosen id so later [`next`](Self::next) calls
    /// never hand it out again.
    pub fn observe(&self, name: &'static str, id: i64) {
        let entry = self.values.entry(name).or_insert_with(|| AtomicI64::new(0));
        entry.value().fetch_max(id, Ordering::SeqCst);
    }

    /// Current value without incrementing.
    pub fn current(&self, name: &'static str) -> i64 {
        self.values
            .get(name)
            .map(|v| v.value().load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let counters = Counters::default();
        assert_eq!(counters.next(DEVICE), 1);
        assert_eq!(counters.next(DEVICE), 2);
        assert_eq!(counters.next(NETWORK), 1);
        assert_eq!(counters.current(COMMAND), 0);
    }

    #[test]
    fn test_observe_skips_taken_ids() {
        let counters = Counters::default();
        counters.observe(USER, 10);
        assert_eq!(counters.next(USER), 11);
        counters.observe(USER, 3);
        assert_eq!(counters.next(USER), 12);
    }

    #[test]
    fn test_concurrent_next_is_unique() {
        let counters = std::sync::Arc::new(Counters::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = counters.clone();
                std::thread::spawn(move || (0..100).map(|_| counters.next(COMMAND)).collect::<Vec<_>>())
            })
            .collect();
        let mut ids: Vec<i64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 800);
    }
}
