//! Parallel philosophy simulation handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{SimulateParams, SimulationResponse};
use crate::app_state::AppState;
use crate::domain::THOUGHT_SLOTS;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /philosophy/simulate`: Run every school of thought concurrently.
///
/// # Errors
///
/// Returns [`GatewayError::SimulationFailed`] if a slot does not finish.
#[utoipa::path(
    get,
    path = "/api/v1/philosophy/simulate",
    tag = "Philosophy",
    summary = "Simulate parallel philosophical thought",
    params(SimulateParams),
    responses(
        (status = 200, description = "Thoughts in fixed slot order", body = SimulationResponse),
        (status = 500, description = "A slot failed", body = ErrorResponse),
    )
)]
pub async fn simulate(
    State(state): State<AppState>,
    Query(params): Query<SimulateParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let parallel_thoughts = state.simulator.simulate().await?;
    Ok(Json(SimulationResponse {
        philosophy_type: params.philosophy_type,
        parallel_thoughts,
        message: format!("Ran {THOUGHT_SLOTS} philosophical approaches in parallel"),
        tasks_used: THOUGHT_SLOTS,
    }))
}

/// Philosophy routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/philosophy/simulate", get(simulate))
}
