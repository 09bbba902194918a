use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::room::Peer;
use crate::websocket::message::ServerMessage;
use crate::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Room statistics
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let room = state.room.read().await;
    let status = if room.is_closed() { "closed" } else { "ok" };
    Json(json!({
        "status": status,
        "peers": room.peer_count(),
        "relayed": room.relayed_total(),
        "replayable": room.replay_log().len(),
    }))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let peer_id = Uuid::new_v4();

    let join_result = {
        let mut room = state.room.write().await;

        if room.is_closed() {
            Err("Room is closed")
        } else if room.is_full() {
            Err("Maximum peer count reached")
        } else {
            // Catch up on paint made before this peer arrived
            let peer = Peer::new(tx.clone());
            for text in room.replay_log() {
                peer.send(ServerMessage::Relay(text).to_ws_message());
            }
            room.add_peer(peer_id, peer);

            let count = room.peer_count();
            room.broadcast_message(&ServerMessage::PeerCount(count));
            Ok(count)
        }
    };

    let peer_count = match join_result {
        Ok(count) => count,
        Err(msg) => {
            let error_msg = ServerMessage::Error(msg.to_string()).to_ws_message();
            let _ = sender.send(error_msg).await;
            let _ = sender.close().await;
            return;
        }
    };

    tracing::info!("Peer {} joined. Total peers: {}", peer_id, peer_count);

    // Spawn task for sending outgoing messages
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text_message(&state, peer_id, &text).await;
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Peer {} disconnected", peer_id);
                break;
            }
            Ok(_) => {
                // Ignore other message types (binary, ping, pong)
            }
            Err(e) => {
                tracing::warn!("WebSocket error for peer {}: {}", peer_id, e);
                break;
            }
        }
    }

    cleanup_peer(&state, peer_id).await;

    send_task.abort();
}

/// Relay an envelope from a peer
async fn handle_text_message(state: &AppState, peer_id: Uuid, text: &str) {
    let mut room = state.room.write().await;
    if !room.relay(peer_id, text) {
        tracing::warn!("Dropping invalid frame from {} ({} bytes)", peer_id, text.len());
    }
}

/// Remove a peer from the room and notify others
async fn cleanup_peer(state: &AppState, peer_id: Uuid) {
    let mut room = state.room.write().await;
    if room.remove_peer(&peer_id).is_some() {
        let count = room.peer_count();
        room.broadcast_message(&ServerMessage::PeerCount(count));
        tracing::info!("Peer {} removed. Remaining peers: {}", peer_id, count);
    }
}
