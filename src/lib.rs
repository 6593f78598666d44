//! # philosophy-gateway
//!
//! HTTP and WebSocket gateway for the philosophy playground.
//!
//! The gateway stores articles, owns a single site-wide "conviction" meter,
//! proxies the AI character and internal SNS services, and pushes every
//! meter change to all connected WebSocket clients at once.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS ConnectionHandler (ws/)
//!     │
//!     ├── ConvictionService, ArticleService (service/)
//!     ├── AiClient, SnsClient (upstream/)
//!     │
//!     ├── ConvictionCounter, Broadcaster, ParallelThoughtSimulator (domain/)
//!     ├── ConnectionRegistry (domain/)
//!     │
//!     └── PostgreSQL or in-memory Store (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upstream;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the full application: REST routes, `/ws`, and the HTTP layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
