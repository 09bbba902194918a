use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use penboard_rs::config::PenboardConfig;
use penboard_rs::{app, room, AppState};

fn load_config() -> penboard_rs::Result<PenboardConfig> {
    match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PENBOARD_CONFIG").ok())
    {
        Some(path) => PenboardConfig::load_file(path),
        None => Ok(PenboardConfig::default()),
    }
}

#[tokio::main]
async fn main() -> penboard_rs::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "penboard=info,penboard_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    let relay = &config.relay;

    // Create shared room state
    let state = AppState::new(relay);

    // Start broadcast timer
    let broadcast_room = Arc::clone(&state.room);
    let flush_interval_ms = relay.flush_interval_ms;
    tokio::spawn(async move {
        room::broadcaster::start_broadcast_timer(broadcast_room, flush_interval_ms).await;
    });

    tracing::info!("Penboard relay running on ws://{}/ws/penboard", relay.listen);
    tracing::info!(
        "   Max peers: {}, flush every {}ms",
        relay.max_peers,
        relay.flush_interval_ms
    );

    let listener = tokio::net::TcpListener::bind(relay.listen).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
