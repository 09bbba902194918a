use futures_util::{SinkExt, StreamExt};
use image::RgbaImage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use penboard_rs::config::{PenConfig, RelayConfig};
use penboard_rs::math::{Ray, Vec2};
use penboard_rs::painting::{RaycastHit, Raycaster};
use penboard_rs::pen::{NetworkContext, Pen, PenTips};
use penboard_rs::room::broadcaster::start_broadcast_timer;
use penboard_rs::scene::{AvatarPathTranslator, PaintScene, SurfaceDesc, SurfaceId};
use penboard_rs::websocket::message::Envelope;
use penboard_rs::{app, AppState};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay(config: RelayConfig) -> SocketAddr {
    let state = AppState::new(&config);
    tokio::spawn(start_broadcast_timer(
        Arc::clone(&state.room),
        config.flush_interval_ms,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/ws/penboard", addr))
        .await
        .unwrap();
    client
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return text;
        }
    }
}

/// Read frames until the relay reports `count` peers
async fn wait_for_peers(client: &mut Client, count: u64) {
    loop {
        let text = next_text(client).await;
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        if value["peerCount"] == count {
            return;
        }
    }
}

/// Read frames until an envelope arrives
async fn next_envelope(client: &mut Client) -> Envelope {
    loop {
        if let Some(envelope) = Envelope::parse(&next_text(client).await) {
            return envelope;
        }
    }
}

struct BoardHit(SurfaceId);

impl Raycaster for BoardHit {
    fn raycast(&self, ray: &Ray, _max_distance: f32) -> Option<RaycastHit> {
        (ray.direction.y > 0.0).then(|| RaycastHit {
            surface: self.0,
            material_name: "Mat_Drawing".to_string(),
            texture_coord: Vec2::new(0.25, 0.75),
            distance: 0.1,
        })
    }
}

#[tokio::test]
async fn relays_envelopes_to_other_peers() {
    let addr = start_relay(RelayConfig::default()).await;

    let mut a = connect(addr).await;
    wait_for_peers(&mut a, 1).await;
    let mut b = connect(addr).await;
    wait_for_peers(&mut b, 2).await;
    wait_for_peers(&mut a, 2).await;

    let frame = r#"{"objectId":"pen-1","message":{"messageType":"brush","red":1,"green":0,"blue":0,"size":5}}"#;
    a.send(Message::Text(frame.to_string())).await.unwrap();

    let envelope = next_envelope(&mut b).await;
    assert_eq!(envelope.object_id, "pen-1");
    assert_eq!(envelope.message_type(), Some("brush"));
}

#[tokio::test]
async fn late_joiner_replays_paint() {
    let addr = start_relay(RelayConfig::default()).await;

    // Painter side: a pen whose outbox is pumped into the socket
    let mut scene = PaintScene::new(AvatarPathTranslator::new(Some("x".into())));
    let board = scene
        .spawn_surface(
            "Room/Board",
            SurfaceDesc::new("Mat_Drawing", Some(RgbaImage::new(64, 64))),
        )
        .unwrap();
    let (tx, mut outbox) = mpsc::unbounded_channel();
    let mut pen = Pen::new(
        "pen-1",
        "participant-x",
        &PenConfig::default(),
        NetworkContext::new("pen-1", tx),
        scene.into_shared(),
    );
    pen.set_brush_size(3.0);
    pen.activate();
    pen.update(&BoardHit(board), &PenTips::default());

    let mut painter = connect(addr).await;
    wait_for_peers(&mut painter, 1).await;
    let mut watcher = connect(addr).await;
    wait_for_peers(&mut watcher, 2).await;

    while let Ok(text) = outbox.try_recv() {
        painter.send(Message::Text(text)).await.unwrap();
    }
    // Garbage is dropped by the relay, the connection stays up
    painter
        .send(Message::Text("not an envelope".into()))
        .await
        .unwrap();
    painter
        .send(Message::Text(
            r#"{"objectId":"pen-1","message":{"messageType":"transform","position":{"x":0,"y":0,"z":0},"rotation":{"x":0,"y":0,"z":0,"w":1},"isDrawing":true}}"#
                .into(),
        ))
        .await
        .unwrap();

    // Frames from one peer are relayed in order, so seeing the transform
    // means everything before it has been handled
    loop {
        if next_envelope(&mut watcher).await.message_type() == Some("transform") {
            break;
        }
    }
    watcher.close(None).await.unwrap();

    // Late joiner receives the replay log before anything else
    let mut scene = PaintScene::new(AvatarPathTranslator::new(Some("y".into())));
    let remote_board = scene
        .spawn_surface(
            "Room/Board",
            SurfaceDesc::new("Mat_Drawing", Some(RgbaImage::new(64, 64))),
        )
        .unwrap();
    let scene = scene.into_shared();
    let (tx, _outbox) = mpsc::unbounded_channel();
    let mut remote = Pen::new(
        "pen-1",
        "participant-y",
        &PenConfig::default(),
        NetworkContext::new("pen-1", tx),
        scene.clone(),
    );

    let mut late = connect(addr).await;
    let mut replayed = Vec::new();
    loop {
        let text = next_text(&mut late).await;
        match Envelope::parse(&text) {
            Some(envelope) => replayed.push(envelope),
            None => break,
        }
    }

    // brush (size), ownership and draw; the transform is not replayed
    let types: Vec<_> = replayed
        .iter()
        .map(|e| e.message_type().unwrap_or_default().to_string())
        .collect();
    assert_eq!(types, vec!["brush", "ownership", "draw"]);

    for envelope in replayed {
        remote.receive_envelope(envelope);
    }
    let scene = scene.borrow();
    let mask = scene.mask(remote_board).unwrap();
    assert_eq!(mask.pixel(16, 48), Some([128, 128, 128, 255]));
    assert_eq!(mask.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(remote.brush().size(), 3.0);
    assert_eq!(remote.owner_id(), Some("participant-x"));
}

#[tokio::test]
async fn full_room_rejects_peer() {
    let config = RelayConfig {
        max_peers: 1,
        ..RelayConfig::default()
    };
    let addr = start_relay(config).await;

    let mut first = connect(addr).await;
    wait_for_peers(&mut first, 1).await;

    let mut second = connect(addr).await;
    let text = next_text(&mut second).await;
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["error"], "Maximum peer count reached");
}
