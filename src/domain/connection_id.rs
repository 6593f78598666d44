//! Type-safe connection identifier.
//!
//! [`ConnectionId`] wraps a [`uuid::Uuid`] (v4) so that registry keys
//! cannot be confused with article or request identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one live WebSocket connection.
///
/// Allocated when the connection is accepted and never reused. Two
/// sockets from the same browser tab get distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
