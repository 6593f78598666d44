//! WebSocket connection state machine.
//!
//! One [`ConnectionHandler`] owns one accepted socket for its whole life:
//!
//! ```text
//! Connecting ──register──▶ Open ──close / read error / writer gone / evicted──▶ Closing
//!                          │  ▲                                                   │
//!                          └──┘ dispatch each inbound message          unregister │
//!                                                                                 ▼
//!                                                                              Closed
//! ```
//!
//! A broadcast that cannot deliver to this connection unregisters it. The
//! handler sees that through
//! [`ClientConnection::closed`](crate::domain::ClientConnection::closed)
//! and closes the socket, so the client gets a close and can reconnect.
//!
//! The socket is split: a writer task drains the connection's outbox into
//! the sink with a bounded write time, while the handler reads and
//! dispatches inbound messages. Registry membership is held by a
//! [`Registration`] guard, so release happens on every exit path.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use super::messages::{InboundKind, InboundMessage};
use crate::app_state::AppState;
use crate::domain::{
    BroadcastEvent, Broadcaster, ConnectionId, ConnectionRegistry, Frame, Registration,
};
use crate::service::ConvictionService;

/// Why a connection left the `Open` state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloseReason {
    /// The peer sent a close frame or the stream ended.
    #[error("peer closed")]
    PeerClosed,
    /// Reading from the socket failed.
    #[error("read error: {0}")]
    ReadError(String),
    /// An inbound message was not a JSON object.
    #[error("malformed message: {0}")]
    Malformed(String),
    /// The writer task stopped after a failed or timed-out write.
    #[error("writer stopped")]
    WriterStopped,
    /// A frame for this connection could not be enqueued.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
    /// A broadcast dropped the connection from the registry.
    #[error("evicted after a failed broadcast delivery")]
    Evicted,
}

/// Drives one client connection from accept to close.
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    conviction: ConvictionService,
    outbox_capacity: usize,
}

impl ConnectionHandler {
    /// Creates a handler wired to the shared state.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            registry: Arc::clone(&state.registry),
            broadcaster: state.broadcaster.clone(),
            conviction: state.conviction.clone(),
            outbox_capacity: state.ws_outbox_capacity,
        }
    }

    /// Runs the connection until it closes and returns why it closed.
    ///
    /// `sink` and `stream` are the two halves of an accepted socket.
    pub async fn run<W, R, E>(self, sink: W, mut stream: R) -> CloseReason
    where
        W: Sink<Message> + Unpin + Send + 'static,
        W::Error: fmt::Display + Send,
        R: Stream<Item = Result<Message, E>> + Unpin,
        E: fmt::Display,
    {
        let (outbox_tx, outbox_rx) = mpsc::channel(self.outbox_capacity.max(1));
        let registration = self.registry.register(outbox_tx);
        let connection_id = registration.id();
        let write_timeout = self.broadcaster.write_timeout();
        let mut writer = tokio::spawn(write_loop(sink, outbox_rx, write_timeout, connection_id));
        let connection = Arc::clone(registration.connection());
        tracing::info!(%connection_id, connections = self.registry.len(), "ws connection open");

        let mut writer_finished = false;
        let reason = loop {
            tokio::select! {
                inbound = stream.next() => {
                    match inbound {
                        Some(Ok(message)) => {
                            if let Err(reason) = self.on_message(&registration, message).await {
                                break reason;
                            }
                        }
                        Some(Err(err)) => break CloseReason::ReadError(err.to_string()),
                        None => break CloseReason::PeerClosed,
                    }
                }
                _ = &mut writer => {
                    writer_finished = true;
                    break CloseReason::WriterStopped;
                }
                () = connection.closed() => break CloseReason::Evicted,
            }
        };

        // Closing: leave the registry first so no new frames are queued.
        drop(connection);
        drop(registration);
        if !writer_finished && tokio::time::timeout(write_timeout, &mut writer).await.is_err() {
            writer.abort();
        }

        tracing::info!(%connection_id, %reason, "ws connection closed");
        reason
    }

    async fn on_message(
        &self,
        registration: &Registration,
        message: Message,
    ) -> Result<(), CloseReason> {
        let parsed = match message {
            Message::Text(text) => InboundMessage::parse(text.as_str()),
            Message::Binary(bytes) => InboundMessage::parse_slice(&bytes),
            Message::Close(_) => return Err(CloseReason::PeerClosed),
            Message::Ping(_) | Message::Pong(_) => return Ok(()),
        };
        let inbound = parsed.map_err(|e| {
            tracing::debug!(connection_id = %registration.id(), error = %e, "malformed ws message");
            CloseReason::Malformed(e.to_string())
        })?;
        self.dispatch(registration, inbound).await
    }

    async fn dispatch(
        &self,
        registration: &Registration,
        inbound: InboundMessage,
    ) -> Result<(), CloseReason> {
        match inbound.kind {
            InboundKind::ConvictionClick => {
                let _ = self.conviction.increment().await;
            }
            InboundKind::VisitorJoin => {
                let _ = self
                    .broadcaster
                    .broadcast(&BroadcastEvent::peer_updated(inbound.into_value()))
                    .await;
            }
            InboundKind::Unknown => {
                let echo = BroadcastEvent::echo(inbound.into_value());
                self.broadcaster
                    .send_to(registration.connection(), &echo)
                    .await
                    .map_err(|e| CloseReason::DeliveryFailed(e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Drains `outbox` into `sink`, bounding each write by `timeout`.
///
/// Returns when every outbox sender is gone or a write fails; dropping the
/// receiver then makes further deliveries to this connection fail.
async fn write_loop<W>(
    mut sink: W,
    mut outbox: mpsc::Receiver<Frame>,
    timeout: Duration,
    connection_id: ConnectionId,
) where
    W: Sink<Message> + Unpin,
    W::Error: fmt::Display,
{
    while let Some(frame) = outbox.recv().await {
        match tokio::time::timeout(timeout, sink.send(Message::Text(frame))).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::debug!(%connection_id, error = %err, "ws write failed");
                return;
            }
            Err(_) => {
                tracing::warn!(
                    %connection_id,
                    timeout_ms = timeout.as_millis(),
                    "ws write timed out"
                );
                return;
            }
        }
    }
    let _ = tokio::time::timeout(timeout, sink.close()).await;
}
