//! REST endpoint handlers organized by resource.

pub mod ai;
pub mod articles;
pub mod conviction;
pub mod philosophy;
pub mod sns;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(articles::routes())
        .merge(conviction::routes())
        .merge(philosophy::routes())
        .merge(ai::routes())
        .merge(sns::routes())
}
