//! Conviction service: the single entry point for bumping the meter.

use std::sync::Arc;

use crate::domain::{BroadcastEvent, Broadcaster, ConvictionCounter, CounterSnapshot};
use crate::persistence::Store;

/// Increments the shared counter, writes it behind to storage, and
/// broadcasts the new value to every connected client.
///
/// Used by both `POST /api/v1/conviction` and the WebSocket
/// `conviction_click` message, so one client's click updates everyone.
#[derive(Debug, Clone)]
pub struct ConvictionService {
    counter: Arc<ConvictionCounter>,
    broadcaster: Broadcaster,
    store: Store,
}

impl ConvictionService {
    /// Creates a new `ConvictionService`.
    #[must_use]
    pub fn new(counter: Arc<ConvictionCounter>, broadcaster: Broadcaster, store: Store) -> Self {
        Self {
            counter,
            broadcaster,
            store,
        }
    }

    /// Seeds a counter from storage, starting at zero if the load fails.
    pub async fn load_counter(store: &Store) -> ConvictionCounter {
        match store.load_conviction().await {
            Ok(snapshot) => {
                tracing::info!(
                    count = snapshot.count,
                    store = store.kind(),
                    "conviction meter loaded"
                );
                ConvictionCounter::with_initial(snapshot)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load conviction meter, starting at zero");
                ConvictionCounter::new()
            }
        }
    }

    /// Returns the current counter state without mutating it.
    #[must_use]
    pub fn current(&self) -> CounterSnapshot {
        self.counter.snapshot()
    }

    /// Increments the counter and broadcasts `conviction_update`.
    ///
    /// Storage failures are logged and do not fail the increment; the
    /// in-memory counter stays authoritative.
    pub async fn increment(&self) -> CounterSnapshot {
        let snapshot = self.counter.increment();

        if let Err(err) = self.store.save_conviction(&snapshot).await {
            tracing::warn!(
                count = snapshot.count,
                error = %err,
                "failed to persist conviction meter"
            );
        }

        let report = self
            .broadcaster
            .broadcast(&BroadcastEvent::counter_updated(snapshot.count))
            .await;

        tracing::info!(
            count = snapshot.count,
            light_effect = snapshot.light_effect(),
            delivered = report.delivered,
            failed = report.failed,
            "conviction incremented"
        );
        snapshot
    }
}
