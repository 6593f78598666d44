//! WebSocket layer: upgrade, per-connection state machine, message parsing.
//!
//! The endpoint at `/ws` pushes `conviction_update`, `visitor_update`, and
//! `echo` frames to browser clients.

pub mod connection;
pub mod handler;
pub mod messages;
