//! Philosophy simulation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for `GET /philosophy/simulate`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimulateParams {
    /// Free-form label echoed back in the response.
    #[serde(rename = "type", default)]
    pub philosophy_type: String,
}

/// Response body for `GET /philosophy/simulate`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SimulationResponse {
    /// The requested `type`, echoed.
    pub philosophy_type: String,
    /// One thought per school, in fixed slot order.
    pub parallel_thoughts: Vec<String>,
    /// Human-readable summary.
    pub message: String,
    /// Number of concurrent tasks used.
    pub tasks_used: usize,
}
