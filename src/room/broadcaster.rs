use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

use crate::room::Room;

/// Start the broadcast timer that flushes buffered envelopes
pub async fn start_broadcast_timer(room: Arc<RwLock<Room>>, flush_interval_ms: u64) {
    let mut timer = interval(Duration::from_millis(flush_interval_ms));

    loop {
        timer.tick().await;

        let mut room_guard = room.write().await;
        if room_guard.is_closed() {
            tracing::info!("Broadcast timer stopped - room is closed");
            break;
        }

        room_guard.flush_buffered_messages();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Peer;
    use axum::extract::ws::Message;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_timer_flushes_and_stops_on_shutdown() {
        let room = Arc::new(RwLock::new(Room::new(10, 16)));
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();
        {
            let mut guard = room.write().await;
            guard.add_peer(a, Peer::new(tx_a));
            guard.add_peer(Uuid::new_v4(), Peer::new(tx_b));
            guard.relay(a, r#"{"objectId":"pen-1","message":{"messageType":"draw"}}"#);
        }

        let timer = tokio::spawn(start_broadcast_timer(Arc::clone(&room), 5));

        let frame = tokio::time::timeout(Duration::from_secs(2), rx_b.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(frame, Message::Text(text) if text.contains("pen-1")));

        room.write().await.shutdown();
        tokio::time::timeout(Duration::from_secs(2), timer)
            .await
            .unwrap()
            .unwrap();
    }
}
