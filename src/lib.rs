pub mod config;
pub mod error;
pub mod math;
pub mod painting;
pub mod pen;
pub mod room;
pub mod scene;
pub mod websocket;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::RelayConfig;
use room::Room;

pub use error::{PenboardError, Result};

/// Relay state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<RwLock<Room>>,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            room: Arc::new(RwLock::new(Room::new(config.max_peers, config.replay_limit))),
        }
    }
}

/// Relay routes: the WebSocket endpoint and a health report
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/ws/penboard", get(websocket::handler::ws_handler))
        .route("/health", get(websocket::handler::health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
