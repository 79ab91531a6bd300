//! Device WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use hive_core::AppError;
use hive_realtime::message::Response as WsResponse;
use hive_realtime::message::serializer::serialize_outbound;

use crate::state::AppState;

/// GET /websocket/device
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_device_socket(state, socket))
}

/// Runs one device session until the socket closes.
async fn handle_device_socket(state: AppState, socket: WebSocket) {
    let engine = state.realtime.clone();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (session, mut outbound_rx) = engine.open_session();
    let session_id = session.id();

    info!(session_id = %session_id, "Device WebSocket connected");

    // Outbound forwarder: everything drained from the session queue.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let text = match serialize_outbound(&message) {
                Ok(text) => text,
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Dropping unserializable frame");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                engine.handle_frame(&session, text.as_str().to_owned());
            }
            Ok(Message::Binary(_)) => {
                let err = AppError::validation("Binary frames are not supported");
                session.send(WsResponse::error("", None, &err));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    engine.close_session(&session).await;
    writer.abort();

    info!(
        session_id = %session_id,
        device = session.device().map(|d| d.guid.as_str()).unwrap_or("-"),
        "Device WebSocket closed"
    );
}
