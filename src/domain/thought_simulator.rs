//! Concurrent "philosophical thought" simulation.
//!
//! [`ParallelThoughtSimulator`] runs one task per [`PhilosophicalSchool`]
//! and writes each result into a fixed slot, so the returned order is the
//! slot order no matter which task finishes first.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::task::{self, JoinSet};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Number of concurrent thought slots.
pub const THOUGHT_SLOTS: usize = 5;

/// One school of thought, bound to a fixed result slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhilosophicalSchool {
    /// Slot 0.
    LogicalPositivism,
    /// Slot 1.
    Phenomenology,
    /// Slot 2.
    Existentialism,
    /// Slot 3.
    ClassicalPhilosophy,
    /// Slot 4.
    AnalyticPhilosophy,
}

impl PhilosophicalSchool {
    /// All schools in slot order.
    pub const ALL: [Self; THOUGHT_SLOTS] = [
        Self::LogicalPositivism,
        Self::Phenomenology,
        Self::Existentialism,
        Self::ClassicalPhilosophy,
        Self::AnalyticPhilosophy,
    ];

    /// The thought this school produces.
    #[must_use]
    pub const fn thought(self) -> &'static str {
        match self {
            Self::LogicalPositivism => {
                "🤔 Logical positivism: deriving objective truth from data..."
            }
            Self::Phenomenology => {
                "💭 Phenomenology: uncovering the structure of consciousness and the essence of experience..."
            }
            Self::Existentialism => {
                "🌟 Existentialism: exploring individual freedom and responsibility..."
            }
            Self::ClassicalPhilosophy => {
                "🏛️ Classical philosophy: applying timeless wisdom to the present..."
            }
            Self::AnalyticPhilosophy => {
                "🔬 Analytic philosophy: solving problems through language and logic..."
            }
        }
    }
}

/// Runs every [`PhilosophicalSchool`] concurrently and collects the
/// thoughts in slot order.
#[derive(Debug, Clone, Default)]
pub struct ParallelThoughtSimulator {
    max_jitter: Duration,
}

impl ParallelThoughtSimulator {
    /// Creates a simulator whose slots finish as soon as they are scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator that delays each slot by a random duration up to
    /// `max_jitter`, scrambling completion order.
    #[must_use]
    pub const fn with_jitter(max_jitter: Duration) -> Self {
        Self { max_jitter }
    }

    /// Runs all slots and returns their thoughts, index `i` holding slot `i`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SimulationFailed`] naming the first slot
    /// whose task panicked or was cancelled. No default is substituted.
    pub async fn simulate(&self) -> Result<Vec<String>, GatewayError> {
        let mut tasks = JoinSet::new();
        let mut slot_of_task = HashMap::with_capacity(THOUGHT_SLOTS);

        for (slot, school) in PhilosophicalSchool::ALL.into_iter().enumerate() {
            let delay = self.jitter();
            let handle = tasks.spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                (slot, school.thought())
            });
            slot_of_task.insert(handle.id(), slot);
        }

        let mut slots: [Option<&'static str>; THOUGHT_SLOTS] = [None; THOUGHT_SLOTS];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (slot, thought))) => {
                    if let Some(cell) = slots.get_mut(slot) {
                        *cell = Some(thought);
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "thought slot failed");
                    return Err(failed_slot(&slot_of_task, err.id()));
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(slot, thought)| {
                thought
                    .map(str::to_owned)
                    .ok_or(GatewayError::SimulationFailed { slot })
            })
            .collect()
    }

    fn jitter(&self) -> Duration {
        let max_micros = u64::try_from(self.max_jitter.as_micros()).unwrap_or(u64::MAX);
        if max_micros == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(rand::rng().random_range(0..=max_micros))
    }
}

/// Maps a failed task back to its slot. A task the simulator did not spawn
/// is an internal fault, not a slot failure.
fn failed_slot(slot_of_task: &HashMap<task::Id, usize>, id: task::Id) -> GatewayError {
    match slot_of_task.get(&id) {
        Some(&slot) => GatewayError::SimulationFailed { slot },
        None => GatewayError::Internal(format!("unknown simulation task {id}")),
    }
}
