//! Registry of live WebSocket connections.
//!
//! [`ConnectionRegistry`] maps each [`ConnectionId`] to a shared
//! [`ClientConnection`], a non-owning handle holding the sending half of
//! the connection's bounded outbox. The socket itself stays with the
//! connection handler; the registry only ever enqueues frames.
//!
//! # Concurrency
//!
//! - The map sits behind a `parking_lot::RwLock`; an entry becomes
//!   visible only once fully constructed and inserted.
//! - [`for_each`](ConnectionRegistry::for_each) iterates a snapshot taken
//!   under the read lock and never holds the lock across an `.await`.
//! - Unregistering clears the entry's `open` flag while holding the write
//!   lock. Iteration checks the flag before each visit, so an entry is not
//!   visited once its removal has completed.
//! - Unregistering also wakes [`ClientConnection::closed`], so the handler
//!   that owns the socket closes it even when a broadcast did the removal.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{Notify, mpsc};
use tokio::sync::mpsc::error::SendTimeoutError;

use super::ConnectionId;

/// One serialized outbound text message, cheap to clone per recipient.
pub type Frame = axum::extract::ws::Utf8Bytes;

/// Why a frame could not be handed to a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The connection was unregistered or its writer has gone away.
    #[error("connection closed")]
    Closed,

    /// The outbox stayed full for the whole write budget.
    #[error("write timed out after {0:?}")]
    TimedOut(Duration),

    /// The event could not be serialized.
    #[error("event could not be encoded: {0}")]
    Encode(String),
}

/// Shared handle to one registered connection.
#[derive(Debug)]
pub struct ClientConnection {
    id: ConnectionId,
    outbox: mpsc::Sender<Frame>,
    open: AtomicBool,
    unregistered: Notify,
}

impl ClientConnection {
    /// Returns the connection's identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// `false` once the connection has been unregistered.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Resolves once the connection has been unregistered, by its own
    /// handler or by a failed broadcast delivery.
    pub async fn closed(&self) {
        let unregistered = self.unregistered.notified();
        if !self.is_open() {
            return;
        }
        unregistered.await;
    }

    /// Enqueues `frame`, waiting at most `timeout` for outbox capacity.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Closed`] if the connection is no longer
    /// open or its writer has stopped, and [`DeliveryError::TimedOut`] if
    /// the outbox stayed full for `timeout`.
    pub async fn deliver(&self, frame: Frame, timeout: Duration) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::Closed);
        }
        match self.outbox.send_timeout(frame, timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(DeliveryError::TimedOut(timeout)),
            Err(SendTimeoutError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }
}

/// Set of currently open client connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<ClientConnection>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection whose frames are delivered through `outbox`.
    ///
    /// Every call creates a distinct entry. The returned [`Registration`]
    /// removes the entry when dropped.
    #[must_use = "dropping the registration unregisters the connection immediately"]
    pub fn register(self: &Arc<Self>, outbox: mpsc::Sender<Frame>) -> Registration {
        let connection = Arc::new(ClientConnection {
            id: ConnectionId::new(),
            outbox,
            open: AtomicBool::new(true),
            unregistered: Notify::new(),
        });
        self.connections
            .write()
            .insert(connection.id, Arc::clone(&connection));
        tracing::debug!(connection_id = %connection.id, "connection registered");
        Registration {
            registry: Arc::clone(self),
            connection,
        }
    }

    /// Removes a connection. Returns `false` if it was already gone.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let mut map = self.connections.write();
        let Some(connection) = map.remove(&id) else {
            return false;
        };
        connection.open.store(false, Ordering::Release);
        drop(map);
        connection.unregistered.notify_waiters();
        tracing::debug!(connection_id = %id, "connection unregistered");
        true
    }

    /// Returns `true` if `id` is currently registered.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().contains_key(&id)
    }

    /// Returns the number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    /// Returns `true` if no connection is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Returns handles to every currently registered connection.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<ClientConnection>> {
        self.connections.read().values().cloned().collect()
    }

    /// Invokes `f` once per registered connection, at most `max_in_flight`
    /// at a time.
    ///
    /// A connection registered during iteration may or may not be visited;
    /// one unregistered before its turn is skipped. A failure from `f` is
    /// collected and iteration carries on with the rest.
    pub async fn for_each<F, Fut>(
        &self,
        max_in_flight: usize,
        f: F,
    ) -> Vec<(ConnectionId, DeliveryError)>
    where
        F: Fn(Arc<ClientConnection>) -> Fut,
        Fut: Future<Output = Result<(), DeliveryError>>,
    {
        let failures = Mutex::new(Vec::new());
        let f = &f;
        let failures_ref = &failures;

        stream::iter(self.snapshot())
            .for_each_concurrent(max_in_flight.max(1), |connection| async move {
                if !connection.is_open() {
                    return;
                }
                let id = connection.id();
                if let Err(err) = f(connection).await {
                    failures_ref.lock().push((id, err));
                }
            })
            .await;

        failures.into_inner()
    }
}

/// Scoped registry membership for one connection.
///
/// Created by [`ConnectionRegistry::register`]; dropping it unregisters the
/// connection, so release happens on every exit path of the handler.
#[derive(Debug)]
pub struct Registration {
    registry: Arc<ConnectionRegistry>,
    connection: Arc<ClientConnection>,
}

impl Registration {
    /// Returns the registered connection's identifier.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.connection.id()
    }

    /// Returns the shared connection handle.
    #[must_use]
    pub fn connection(&self) -> &Arc<ClientConnection> {
        &self.connection
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(self.connection.id());
    }
}
