//! Fan-out of [`BroadcastEvent`]s to every registered connection.
//!
//! The event is serialized once; the same [`Frame`] is then enqueued on
//! each connection's outbox with a bounded wait. A connection that cannot
//! take the frame in time is logged and unregistered, and never holds up
//! delivery to the others.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::BroadcastEvent;
use super::connection_registry::{ClientConnection, ConnectionRegistry, DeliveryError, Frame};

/// Outcome of one [`Broadcaster::broadcast`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections a delivery was attempted on.
    pub attempted: usize,
    /// Deliveries that reached the connection's outbox.
    pub delivered: usize,
    /// Deliveries that failed; those connections were unregistered.
    pub failed: usize,
}

/// Delivers events to all live connections in a [`ConnectionRegistry`].
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    write_timeout: Duration,
    max_in_flight: usize,
}

impl Broadcaster {
    /// Creates a broadcaster over `registry`.
    ///
    /// `write_timeout` bounds the wait on any single connection;
    /// `max_in_flight` bounds how many connections are written in parallel.
    #[must_use]
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        write_timeout: Duration,
        max_in_flight: usize,
    ) -> Self {
        Self {
            registry,
            write_timeout,
            max_in_flight,
        }
    }

    /// Returns the per-connection write budget.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Sends `event` to every registered connection.
    ///
    /// Never fails: per-connection errors are logged, counted in the
    /// report, and the offending connections are unregistered.
    pub async fn broadcast(&self, event: &BroadcastEvent) -> BroadcastReport {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(
                    event_type = event.event_type_str(),
                    error = %err,
                    "failed to encode broadcast event"
                );
                return BroadcastReport::default();
            }
        };

        let attempted = AtomicUsize::new(0);
        let write_timeout = self.write_timeout;
        let failures = self
            .registry
            .for_each(self.max_in_flight, |connection| {
                attempted.fetch_add(1, Ordering::Relaxed);
                let frame = frame.clone();
                async move { connection.deliver(frame, write_timeout).await }
            })
            .await;

        for (id, err) in &failures {
            tracing::warn!(
                connection_id = %id,
                event_type = event.event_type_str(),
                error = %err,
                "delivery failed, dropping connection"
            );
            self.registry.unregister(*id);
        }

        let attempted = attempted.into_inner();
        let report = BroadcastReport {
            attempted,
            delivered: attempted.saturating_sub(failures.len()),
            failed: failures.len(),
        };
        tracing::debug!(
            event_type = event.event_type_str(),
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast complete"
        );
        report
    }

    /// Sends `event` to a single connection only.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the event cannot be encoded or the
    /// connection does not accept the frame within the write budget.
    pub async fn send_to(
        &self,
        connection: &ClientConnection,
        event: &BroadcastEvent,
    ) -> Result<(), DeliveryError> {
        let frame: Frame = event
            .to_frame()
            .map_err(|err| DeliveryError::Encode(err.to_string()))?;
        connection.deliver(frame, self.write_timeout).await
    }
}
