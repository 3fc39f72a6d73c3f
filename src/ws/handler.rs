//! WebSocket upgrade handler — attaches a client to the relay hub for the
//! lifetime of its socket.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::debug;

use crate::api::state::SharedState;
use crate::relay::RelayHub;

use super::messages::ClientEvent;

/// GET /ws — upgrade to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Core WebSocket session logic.
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let hub = state.hub.clone();
    let (conn_id, mut rx) = hub.connect().await;
    let (mut sink, mut stream) = socket.split();

    // Writer task: forward hub events → WS sink.
    let mut writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if sink
                .send(Message::Text(event.to_json().into()))
                .await
                .is_err()
            {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Reader task: client frames → hub.
    let reader_hub = hub.clone();
    let reader_id = conn_id.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => {
                    handle_client_message(&reader_hub, &reader_id, &text).await;
                }
                Message::Close(_) => break,
                _ => {} // Binary / Ping / Pong handled by Axum
            }
        }
    });

    // Wait for either task to finish, then abort the other.
    tokio::select! {
        _ = &mut writer => { reader.abort(); }
        _ = &mut reader => { writer.abort(); }
    }

    hub.disconnect(&conn_id).await;
}

/// Decode and dispatch one client text frame. Undecodable frames are dropped.
async fn handle_client_message(hub: &RelayHub, conn_id: &str, text: &str) {
    match ClientEvent::parse(text) {
        Ok(event) => hub.handle(conn_id, event).await,
        Err(e) => debug!(conn_id, "dropped WS frame: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
