//! Internal SNS proxy handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /sns/feed`: Fetch the post feed.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the SNS service fails.
#[utoipa::path(
    get,
    path = "/api/v1/sns/feed",
    tag = "SNS",
    summary = "Get the feed",
    responses(
        (status = 200, description = "Feed", body = serde_json::Value),
        (status = 502, description = "SNS service unavailable", body = ErrorResponse),
    )
)]
pub async fn feed(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.sns.feed().await?))
}

/// `POST /sns/posts`: Create a post.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the SNS service fails.
#[utoipa::path(
    post,
    path = "/api/v1/sns/posts",
    tag = "SNS",
    summary = "Create a post",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Created post", body = serde_json::Value),
        (status = 502, description = "SNS service unavailable", body = ErrorResponse),
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Json(post): Json<Map<String, Value>>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.sns.create_post(&post).await?))
}

/// `GET /sns/trending`: Fetch trending topics.
///
/// # Errors
///
/// Returns [`GatewayError::UpstreamUnavailable`] if the SNS service fails.
#[utoipa::path(
    get,
    path = "/api/v1/sns/trending",
    tag = "SNS",
    summary = "Get trending topics",
    responses(
        (status = 200, description = "Trending topics", body = serde_json::Value),
        (status = 502, description = "SNS service unavailable", body = ErrorResponse),
    )
)]
pub async fn trending(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.sns.trending().await?))
}

/// SNS proxy routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sns/feed", get(feed))
        .route("/sns/posts", post(create_post))
        .route("/sns/trending", get(trending))
}
