//! Conviction meter handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ConvictionIncrementResponse;
use crate::app_state::AppState;
use crate::persistence::ConvictionMeter;
use crate::persistence::models::CONVICTION_METER_ID;

/// `POST /conviction`: Increment the site-wide meter.
///
/// Every connected WebSocket client receives the resulting
/// `conviction_update`.
#[utoipa::path(
    post,
    path = "/api/v1/conviction",
    tag = "Conviction",
    summary = "Increment the conviction meter",
    responses(
        (status = 200, description = "New meter value", body = ConvictionIncrementResponse),
    )
)]
pub async fn increment_conviction(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.conviction.increment().await;
    Json(ConvictionIncrementResponse {
        count: snapshot.count,
        message: "Conviction rising! The whole site lights up ✨".to_string(),
        light_effect: snapshot.light_effect(),
    })
}

/// `GET /conviction`: Read the meter.
#[utoipa::path(
    get,
    path = "/api/v1/conviction",
    tag = "Conviction",
    summary = "Read the conviction meter",
    responses(
        (status = 200, description = "Current meter", body = ConvictionMeter),
    )
)]
pub async fn get_conviction(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.conviction.current();
    Json(ConvictionMeter {
        id: CONVICTION_METER_ID,
        count: snapshot.count,
        last_hit: snapshot.last_hit,
    })
}

/// Conviction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/conviction", get(get_conviction).post(increment_conviction))
}
