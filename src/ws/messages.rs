//! Inbound WebSocket message parsing.
//!
//! Clients send JSON objects of the form `{ "type": string, ...fields }`.
//! Only the `type` tag is interpreted; every other field is opaque and is
//! relayed or echoed verbatim.

use serde_json::{Map, Value};

/// Recognized inbound message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    /// `"conviction_click"`: bump the shared counter.
    ConvictionClick,
    /// `"visitor_join"`: relay to every client as `visitor_update`.
    VisitorJoin,
    /// Anything else, including a missing `type`: echo to the sender.
    Unknown,
}

impl InboundKind {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("conviction_click") => Self::ConvictionClick,
            Some("visitor_join") => Self::VisitorJoin,
            _ => Self::Unknown,
        }
    }
}

/// One parsed client message.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Dispatch kind derived from the `type` field.
    pub kind: InboundKind,
    fields: Map<String, Value>,
}

impl InboundMessage {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `text` is not a JSON object.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::from_fields)
    }

    /// Parses a binary frame holding UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `bytes` is not a JSON object.
    pub fn parse_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self::from_fields)
    }

    fn from_fields(fields: Map<String, Value>) -> Self {
        let kind = InboundKind::from_tag(fields.get("type").and_then(Value::as_str));
        Self { kind, fields }
    }

    /// Returns the whole message as a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
