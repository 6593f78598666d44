//! Domain layer: the real-time broadcast core.
//!
//! This module holds the two pieces of process-wide mutable state, the
//! [`ConvictionCounter`] and the [`ConnectionRegistry`], together with the
//! [`Broadcaster`] that fans [`BroadcastEvent`]s out to every live
//! connection and the [`ParallelThoughtSimulator`].

pub mod broadcast_event;
pub mod broadcaster;
pub mod connection_id;
pub mod connection_registry;
pub mod conviction_counter;
pub mod thought_simulator;

pub use broadcast_event::{BroadcastEvent, EventKind};
pub use broadcaster::{BroadcastReport, Broadcaster};
pub use connection_id::ConnectionId;
pub use connection_registry::{
    ClientConnection, ConnectionRegistry, DeliveryError, Frame, Registration,
};
pub use conviction_counter::{
    ConvictionCounter, CounterSnapshot, LIGHT_EFFECT_THRESHOLD, light_effect,
};
pub use thought_simulator::{ParallelThoughtSimulator, PhilosophicalSchool, THOUGHT_SLOTS};
