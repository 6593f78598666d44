//! Site-wide conviction meter.
//!
//! [`ConvictionCounter`] is the single process-wide counter that every
//! `conviction_click` and `POST /api/v1/conviction` bumps. It is the
//! in-memory authority; durable storage (when enabled) is written behind
//! it by [`crate::service::ConvictionService`].

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Counts strictly above this value turn the site-wide light effect on.
pub const LIGHT_EFFECT_THRESHOLD: i64 = 5;

/// Returns `true` when `count` should trigger the light effect.
#[must_use]
pub const fn light_effect(count: i64) -> bool {
    count > LIGHT_EFFECT_THRESHOLD
}

/// Point-in-time view of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Current value.
    pub count: i64,
    /// Time of the most recent increment, if any happened.
    pub last_hit: Option<DateTime<Utc>>,
}

impl CounterSnapshot {
    /// Whether this snapshot crosses the light-effect threshold.
    #[must_use]
    pub const fn light_effect(&self) -> bool {
        light_effect(self.count)
    }
}

/// Linearizable counter with a last-update timestamp.
///
/// Every [`increment`](Self::increment) runs under one short critical
/// section, so concurrent callers each observe a distinct, gap-free
/// successor value.
#[derive(Debug)]
pub struct ConvictionCounter {
    state: Mutex<CounterSnapshot>,
}

impl ConvictionCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(CounterSnapshot {
            count: 0,
            last_hit: None,
        })
    }

    /// Creates a counter seeded from a previously stored snapshot.
    #[must_use]
    pub fn with_initial(initial: CounterSnapshot) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }

    /// Adds one and returns the snapshot that includes this increment.
    pub fn increment(&self) -> CounterSnapshot {
        let mut state = self.state.lock();
        state.count = state.count.saturating_add(1);
        state.last_hit = Some(Utc::now());
        *state
    }

    /// Returns the current value without mutating it.
    #[must_use]
    pub fn read(&self) -> i64 {
        self.state.lock().count
    }

    /// Returns the current value together with the last-hit timestamp.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        *self.state.lock()
    }
}

impl Default for ConvictionCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_zero_without_timestamp() {
        let counter = ConvictionCounter::new();
        assert_eq!(counter.read(), 0);
        assert!(counter.snapshot().last_hit.is_none());
    }

    #[test]
    fn increment_returns_successor_and_stamps_time() {
        let counter = ConvictionCounter::new();
        let snap = counter.increment();
        assert_eq!(snap.count, 1);
        assert!(snap.last_hit.is_some());
        assert_eq!(counter.read(), 1);
    }

    #[test]
    fn read_does_not_mutate() {
        let counter = ConvictionCounter::new();
        let _ = counter.increment();
        assert_eq!(counter.read(), 1);
        assert_eq!(counter.read(), 1);
    }

    #[test]
    fn seeded_counter_continues_from_initial() {
        let counter = ConvictionCounter::with_initial(CounterSnapshot {
            count: 41,
            last_hit: Some(Utc::now()),
        });
        assert_eq!(counter.increment().count, 42);
    }

    #[test]
    fn light_effect_threshold_is_strict() {
        assert!(!light_effect(5));
        assert!(light_effect(6));
        assert!(!light_effect(0));
    }

    #[test]
    fn snapshot_light_effect_follows_count() {
        let counter = ConvictionCounter::with_initial(CounterSnapshot {
            count: 4,
            last_hit: None,
        });
        assert!(!counter.increment().light_effect());
        assert!(counter.increment().light_effect());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_gap_free() {
        const TASKS: i64 = 32;
        const PER_TASK: i64 = 50;

        let counter = Arc::new(ConvictionCounter::with_initial(CounterSnapshot {
            count: 100,
            last_hit: None,
        }));

        let mut handles = Vec::new();
        for _ in 0..TASKS {
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..PER_TASK {
                    seen.push(counter.increment().count);
                    tokio::task::yield_now().await;
                }
                seen
            }));
        }

        let mut all = Vec::new();
        for handle in handles {
            let Ok(seen) = handle.await else {
                panic!("increment task failed");
            };
            all.extend(seen);
        }
        all.sort_unstable();

        let expected: Vec<i64> = (101..=100 + TASKS * PER_TASK).collect();
        assert_eq!(all, expected);
        assert_eq!(counter.read(), 100 + TASKS * PER_TASK);
    }
}
