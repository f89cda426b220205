//! Integration tests for the realtime `WebSocket` channel.
//!
//! Each test serves the router on an ephemeral port and talks to `/ws`
//! over a real socket. Readings are pushed with [`tick`] rather than the
//! background ticker so every frame is deterministic.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use twinforge_api::{ApiSettings, AppState, RandomReadings, build_router, tick};
use twinforge_genai::{GenerationConfig, GenerationService};
use twinforge_store::EntityStore;
use twinforge_types::DeviceId;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

fn make_state() -> Arc<AppState> {
    let config = GenerationConfig {
        api_url: "http://127.0.0.1:9".to_owned(),
        api_key: "test-key".to_owned(),
        ..GenerationConfig::default()
    };
    let generation = GenerationService::new(&config).unwrap();
    Arc::new(AppState::new(
        EntityStore::with_sample_data(),
        generation,
        ApiSettings::default(),
    ))
}

/// Readings always attributed to device 2.
fn readings() -> RandomReadings<SmallRng> {
    RandomReadings::new(SmallRng::seed_from_u64(7), vec![DeviceId::new(2)], 0.0, 100.0).unwrap()
}

async fn serve(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (socket, _response) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
}

/// The next text frame, decoded as JSON.
async fn next_json(socket: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(FRAME_TIMEOUT, socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn wait_for_clients(state: &AppState, expected: usize) {
    for _ in 0..500 {
        if state.connected_clients() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(state.connected_clients(), expected);
}

#[tokio::test]
async fn connected_is_the_first_frame() {
    let state = make_state();
    let addr = serve(Arc::clone(&state)).await;

    let mut socket = connect(addr).await;
    let frame = next_json(&mut socket).await;

    assert_eq!(
        frame,
        json!({"type": "connected", "message": "Connected to digital twin platform"})
    );
    assert_eq!(state.connected_clients(), 1);
}

#[tokio::test]
async fn malformed_frames_are_dropped_and_the_socket_stays_open() {
    let state = make_state();
    let addr = serve(Arc::clone(&state)).await;
    let mut socket = connect(addr).await;
    next_json(&mut socket).await;

    socket.send(Message::text("{not json")).await.unwrap();
    socket.send(Message::text(r#"{"a": 1}"#)).await.unwrap();

    // The malformed frame produced nothing, so the echo comes next.
    let frame = next_json(&mut socket).await;
    assert_eq!(frame, json!({"type": "echo", "data": {"a": 1}}));
    assert_eq!(state.connected_clients(), 1);
}

#[tokio::test]
async fn readings_reach_every_open_socket() {
    let state = make_state();
    let addr = serve(Arc::clone(&state)).await;
    let mut first = connect(addr).await;
    let mut second = connect(addr).await;
    next_json(&mut first).await;
    next_json(&mut second).await;
    wait_for_clients(&state, 2).await;

    let reached = tick(&state, &mut readings());
    assert_eq!(reached, 2);

    for socket in [&mut first, &mut second] {
        let frame = next_json(socket).await;
        assert_eq!(frame["type"], "iot_update");
        assert_eq!(frame["data"]["deviceId"], 2);
        let value = frame["data"]["value"].as_f64().unwrap();
        assert!((0.0..100.0).contains(&value));
    }
}

#[tokio::test]
async fn echoes_go_only_to_the_sender() {
    let state = make_state();
    let addr = serve(Arc::clone(&state)).await;
    let mut sender = connect(addr).await;
    let mut other = connect(addr).await;
    next_json(&mut sender).await;
    next_json(&mut other).await;

    sender
        .send(Message::text(r#"{"note": "hi"}"#))
        .await
        .unwrap();
    assert_eq!(next_json(&mut sender).await["type"], "echo");

    tick(&state, &mut readings());
    assert_eq!(next_json(&mut other).await["type"], "iot_update");
}

#[tokio::test]
async fn closing_releases_the_subscription() {
    let state = make_state();
    let addr = serve(Arc::clone(&state)).await;
    let mut socket = connect(addr).await;
    next_json(&mut socket).await;
    assert_eq!(state.connected_clients(), 1);

    socket.close(None).await.unwrap();
    wait_for_clients(&state, 0).await;

    assert_eq!(tick(&state, &mut readings()), 0);
}
