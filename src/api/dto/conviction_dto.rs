//! Conviction meter DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Response body for `POST /conviction`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvictionIncrementResponse {
    /// Counter value after this increment.
    pub count: i64,
    /// Human-readable confirmation.
    pub message: String,
    /// `true` when `count > 5`.
    pub light_effect: bool,
}
