//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;
use futures_util::StreamExt;

use super::connection::ConnectionHandler;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let handler = ConnectionHandler::new(&state);

    ws.on_upgrade(move |socket| async move {
        let (sink, stream) = socket.split();
        let _ = handler.run(sink, stream).await;
    })
}
