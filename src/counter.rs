//! Progress counters shared by the workers of one session
//!
//! Every mutation is an atomic increment; reads never wait on writers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically incrementing counter observable from any thread
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    #[must_use]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Add one and return the new value
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Only called between runs, when no worker holds the counter
    pub(crate) fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

/// The three counters a session reports while it runs
#[derive(Debug, Default)]
pub struct SessionCounters {
    /// Files resolved from the local cache
    pub cache_hits: Counter,
    /// Files fetched from the log server
    pub network_fetches: Counter,
    /// Results committed to the registry
    pub results_found: Counter,
}

impl SessionCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            cache_hits: self.cache_hits.get(),
            network_fetches: self.network_fetches.get(),
            results_found: self.results_found.get(),
        }
    }

    pub(crate) fn reset(&self) {
        self.cache_hits.reset();
        self.network_fetches.reset();
        self.results_found.reset();
    }
}

/// Point-in-time copy of [`SessionCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersSnapshot {
    pub cache_hits: u64,
    pub network_fetches: u64,
    pub results_found: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_increment_returns_new_value() {
        let counter = Counter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counter = Arc::new(Counter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.get(), 8000);
    }

    #[test]
    fn test_reset_zeroes_every_counter() {
        let counters = SessionCounters::new();
        counters.cache_hits.increment();
        counters.network_fetches.increment();
        counters.results_found.increment();
        counters.reset();
        assert_eq!(counters.snapshot(), CountersSnapshot::default());
    }
}
