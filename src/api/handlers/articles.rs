//! Article handlers: list, get, create.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ArticleListResponse, CreateArticleRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::persistence::Article;

/// `GET /articles`: List all articles.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    tag = "Articles",
    summary = "List articles",
    responses(
        (status = 200, description = "All articles", body = ArticleListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let articles = state.articles.list().await?;
    Ok(Json(ArticleListResponse { articles }))
}

/// `GET /articles/{id}`: Get one article.
///
/// # Errors
///
/// Returns [`GatewayError::ArticleNotFound`] if the article does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    tag = "Articles",
    summary = "Get an article",
    params(
        ("id" = i64, Path, description = "Article ID"),
    ),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 404, description = "Article not found", body = ErrorResponse),
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(state.articles.get(id).await?))
}

/// `POST /articles`: Create an article and queue its AI analysis.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on a blank title or content.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    tag = "Articles",
    summary = "Create an article",
    description = "Stores the article and starts a background AI analysis of its content. The response does not wait for the analysis.",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = Article),
        (status = 400, description = "Invalid article", body = ErrorResponse),
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    Json(req): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let article = state.articles.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// Article routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/{id}", get(get_article))
}
