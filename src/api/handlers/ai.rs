//! AI service proxy handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AnalyzeRequest, ChatRequest, WisdomParams};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /ai/chat`: Chat with a philosopher character.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the AI service fails.
#[utoipa::path(
    post,
    path = "/api/v1/ai/chat",
    tag = "AI",
    summary = "Chat with a character",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Character reply", body = serde_json::Value),
        (status = 502, description = "AI service unavailable", body = ErrorResponse),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.ai.chat(&req).await?))
}

/// `POST /ai/analyze`: Philosophical analysis of a text.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the AI service fails.
#[utoipa::path(
    post,
    path = "/api/v1/ai/analyze",
    tag = "AI",
    summary = "Analyze a text",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis", body = serde_json::Value),
        (status = 502, description = "AI service unavailable", body = ErrorResponse),
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.ai.analyze(&req).await?))
}

/// `GET /ai/personalities`: List character personalities.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the AI service fails.
#[utoipa::path(
    get,
    path = "/api/v1/ai/personalities",
    tag = "AI",
    summary = "List personalities",
    responses(
        (status = 200, description = "Personalities", body = serde_json::Value),
        (status = 502, description = "AI service unavailable", body = ErrorResponse),
    )
)]
pub async fn personalities(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.ai.personalities().await?))
}

/// `GET /ai/wisdom`: Generate wisdom on a theme.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the AI service fails.
#[utoipa::path(
    get,
    path = "/api/v1/ai/wisdom",
    tag = "AI",
    summary = "Generate wisdom",
    params(WisdomParams),
    responses(
        (status = 200, description = "Wisdom", body = serde_json::Value),
        (status = 502, description = "AI service unavailable", body = ErrorResponse),
    )
)]
pub async fn wisdom(
    State(state): State<AppState>,
    Query(params): Query<WisdomParams>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.ai.wisdom(params.theme_or_default()).await?))
}

/// AI proxy routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ai/chat", post(chat))
        .route("/ai/analyze", post(analyze))
        .route("/ai/personalities", get(personalities))
        .route("/ai/wisdom", get(wisdom))
}
