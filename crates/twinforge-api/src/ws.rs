//! `WebSocket` handler for the realtime channel.
//!
//! Clients connect to `GET /ws`. The first frame on every connection is
//! a `connected` acknowledgement. After that the socket receives every
//! `iot_update` the ticker publishes, and each inbound JSON text frame is
//! reflected back as an `echo`. Inbound frames have no effect on other
//! connections.
//!
//! If a client falls behind, lagged readings are silently skipped and
//! the client resumes from the most recent one. A malformed inbound
//! frame is logged and otherwise ignored.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use twinforge_types::ServerMessage;
use uuid::Uuid;

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// The reply to an inbound text frame, if it holds JSON.
pub fn echo_reply(text: &str) -> Option<ServerMessage> {
    serde_json::from_str(text)
        .ok()
        .map(|data| ServerMessage::Echo { data })
}

/// Serialize and send one message. Returns `false` once the peer is gone.
async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize realtime message: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handle the `WebSocket` lifecycle: acknowledge, then forward broadcast
/// readings and answer inbound frames until either side closes.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let connection = Uuid::new_v4();
    // Subscribe before acknowledging so no reading is missed in between.
    let mut rx = state.subscribe();
    debug!(%connection, clients = state.connected_clients(), "WebSocket client connected");

    if !send_message(&mut socket, &ServerMessage::connected()).await {
        debug!(%connection, "WebSocket client disconnected before acknowledgement");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(message) => {
                        if !send_message(&mut socket, &message).await {
                            debug!(%connection, "WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(%connection, skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!(%connection, "Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let Some(reply) = echo_reply(text.as_str()) else {
                            warn!(%connection, "ignoring malformed WebSocket message");
                            continue;
                        };
                        if !send_message(&mut socket, &reply).await {
                            debug!(%connection, "WebSocket client disconnected (echo failed)");
                            return;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%connection, "WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%connection, "WebSocket client disconnected");
                        return;
                    }
                    Some(Err(e)) => {
                        debug!(%connection, "WebSocket error: {e}");
                        return;
                    }
                    Some(Ok(Message::Binary(_) | Message::Pong(_))) => {}
                }
            }
        }
    }
}
