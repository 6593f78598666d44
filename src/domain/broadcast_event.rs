//! Events pushed to every live WebSocket client.
//!
//! A [`BroadcastEvent`] is built per state change, serialized once into a
//! [`Frame`], and handed to the [`super::Broadcaster`]. Events are never
//! persisted.
//!
//! Wire shape:
//! ```json
//! { "type": "conviction_update", "count": 7, "light_effect": true,
//!   "timestamp": "2026-01-01T00:00:00Z" }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::connection_registry::Frame;
use super::conviction_counter::light_effect;

/// Tagged payload of a [`BroadcastEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The shared conviction counter moved.
    #[serde(rename = "conviction_update")]
    CounterUpdated {
        /// Counter value after the increment.
        count: i64,
        /// `count > 5`.
        light_effect: bool,
    },

    /// A client announced itself; relayed verbatim to everyone.
    #[serde(rename = "visitor_update")]
    PeerUpdated {
        /// The inbound message as received.
        data: serde_json::Value,
    },

    /// Unknown inbound message, returned to its sender only.
    Echo {
        /// The inbound message as received.
        data: serde_json::Value,
    },
}

/// A payload plus the time it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastEvent {
    /// Variant-specific fields, flattened next to `timestamp`.
    #[serde(flatten)]
    pub kind: EventKind,
    /// Creation time of the event.
    pub timestamp: DateTime<Utc>,
}

impl BroadcastEvent {
    /// Wraps `kind` with the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    /// `conviction_update` for the given post-increment count.
    #[must_use]
    pub fn counter_updated(count: i64) -> Self {
        Self::new(EventKind::CounterUpdated {
            count,
            light_effect: light_effect(count),
        })
    }

    /// `visitor_update` relaying `data`.
    #[must_use]
    pub fn peer_updated(data: serde_json::Value) -> Self {
        Self::new(EventKind::PeerUpdated { data })
    }

    /// `echo` returning `data` to its sender.
    #[must_use]
    pub fn echo(data: serde_json::Value) -> Self {
        Self::new(EventKind::Echo { data })
    }

    /// Returns the wire `type` tag as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self.kind {
            EventKind::CounterUpdated { .. } => "conviction_update",
            EventKind::PeerUpdated { .. } => "visitor_update",
            EventKind::Echo { .. } => "echo",
        }
    }

    /// Serializes the event into a text frame.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialization fails.
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        serde_json::to_string(self).map(Frame::from)
    }
}
