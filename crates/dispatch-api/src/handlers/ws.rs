//! WebSocket upgrade handler.

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error};

use dispatch_realtime::OutboundMessage;

use crate::state::AppState;

/// Query parameters for WebSocket authentication.
#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Bearer token issued at login.
    #[serde(default)]
    pub access_token: String,
    /// Actor role the connection is opened as.
    #[serde(default)]
    pub role: String,
}

/// GET /socket?access_token={jwt}&role={role}
///
/// The upgrade always succeeds; the outcome of authentication is the first
/// frame sent on the socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, query, socket))
}

async fn handle_socket(state: AppState, query: WsQuery, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut outbound_rx) = mpsc::channel(state.config.realtime.outbound_buffer_size);

    let connected = state
        .gateway
        .on_connect(&query.access_token, &query.role, tx)
        .await;

    // Forward queued messages until the queue closes or a close is requested.
    let mut outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let frame = match msg {
                OutboundMessage::Close { reason } => {
                    let _ = ws_tx
                        .send(Message::Close(Some(CloseFrame {
                            code: close_code::NORMAL,
                            reason: reason.into(),
                        })))
                        .await;
                    break;
                }
                other => match serde_json::to_string(&other) {
                    Ok(text) => Message::Text(text.into()),
                    Err(e) => {
                        error!(error = %e, "Failed to serialize outbound message");
                        continue;
                    }
                },
            };
            if ws_tx.send(frame).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    // A rejected connection only receives its reply; the sender was dropped
    // with the rejection so the forwarder ends once the reply is written.
    let Ok(handle) = connected else {
        let _ = outbound_task.await;
        return;
    };
    let conn_id = handle.id;
    drop(handle);

    loop {
        tokio::select! {
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => {
                    state.gateway.on_disconnect(&conn_id, "client disconnect");
                    break;
                }
                Some(Ok(_)) => debug!(conn_id = %conn_id, "Ignoring inbound frame"),
                Some(Err(e)) => {
                    state.gateway.on_error(&conn_id, &e);
                    break;
                }
            },
            _ = &mut outbound_task => {
                state.gateway.on_disconnect(&conn_id, "server close");
                break;
            }
        }
    }

    outbound_task.abort();
}
