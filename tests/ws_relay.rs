//! End-to-end WebSocket tests against a live listener.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use webtty_gateway::api;
use webtty_gateway::config::RelayConfig;
use webtty_gateway::server;

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const ECHO: &str = r#"{"type":"echo","data":"hello"}"#;

async fn spawn_relay(config: RelayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = api::build_router(&config);
    tokio::spawn(server::run(listener, router, std::future::pending()));
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    ws
}

async fn recv(ws: &mut Client) -> Message {
    timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("reply within timeout")
        .expect("stream open")
        .expect("valid frame")
}

#[tokio::test]
async fn echo_round_trip_is_byte_identical() {
    let addr = spawn_relay(RelayConfig::default()).await;
    let mut ws = connect(addr).await;

    ws.send(Message::text(ECHO)).await.unwrap();
    assert_eq!(recv(&mut ws).await, Message::text(ECHO));
}

#[tokio::test]
async fn binary_echo_keeps_frame_kind() {
    let addr = spawn_relay(RelayConfig::default()).await;
    let mut ws = connect(addr).await;

    let payload = br#"{"type":"echo","data":"bin","extra":true}"#.to_vec();
    ws.send(Message::binary(payload.clone())).await.unwrap();
    assert_eq!(recv(&mut ws).await, Message::binary(payload));
}

#[tokio::test]
async fn unknown_and_malformed_frames_get_no_reply() {
    let addr = spawn_relay(RelayConfig::default()).await;
    let mut ws = connect(addr).await;
    let later = r#"{"type":"echo","data":"after"}"#;

    ws.send(Message::text(ECHO)).await.unwrap();
    ws.send(Message::text(r#"{"type":"ping","data":"x"}"#))
        .await
        .unwrap();
    ws.send(Message::text("not-json")).await.unwrap();
    ws.send(Message::text(later)).await.unwrap();

    assert_eq!(recv(&mut ws).await, Message::text(ECHO));
    assert_eq!(recv(&mut ws).await, Message::text(later));
}

#[tokio::test]
async fn normal_close_ends_the_connection() {
    let addr = spawn_relay(RelayConfig::default()).await;
    let mut ws = connect(addr).await;

    ws.close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: "done".into(),
    }))
    .await
    .unwrap();

    let ended = timeout(Duration::from_secs(5), async {
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                continue;
            }
            panic!("unexpected frame after close: {msg:?}");
        }
    })
    .await;
    assert!(ended.is_ok());
}

#[tokio::test]
async fn connections_are_independent() {
    let addr = spawn_relay(RelayConfig::default()).await;
    let mut idle = connect(addr).await;
    let mut busy = connect(addr).await;

    busy.send(Message::text(ECHO)).await.unwrap();
    assert_eq!(recv(&mut busy).await, Message::text(ECHO));

    drop(busy);

    idle.send(Message::text(ECHO)).await.unwrap();
    assert_eq!(recv(&mut idle).await, Message::text(ECHO));
}

#[tokio::test]
async fn origin_allow_list_is_enforced() {
    let config = RelayConfig {
        allow_any_origin: false,
        allowed_origins: vec!["https://app.example".to_string()],
        ..RelayConfig::default()
    };
    let addr = spawn_relay(config).await;

    let mut denied = format!("ws://{addr}/ws").into_client_request().unwrap();
    denied
        .headers_mut()
        .insert("origin", HeaderValue::from_static("https://evil.example"));
    assert!(connect_async(denied).await.is_err());

    let mut allowed = format!("ws://{addr}/ws").into_client_request().unwrap();
    allowed
        .headers_mut()
        .insert("origin", HeaderValue::from_static("https://app.example"));
    let (mut ws, _) = connect_async(allowed).await.unwrap();
    ws.send(Message::text(ECHO)).await.unwrap();
    assert_eq!(recv(&mut ws).await, Message::text(ECHO));
}

#[tokio::test]
async fn permissive_default_accepts_any_origin() {
    let addr = spawn_relay(RelayConfig::default()).await;

    let mut req = format!("ws://{addr}/ws").into_client_request().unwrap();
    req.headers_mut()
        .insert("origin", HeaderValue::from_static("https://anywhere.example"));
    assert!(connect_async(req).await.is_ok());
}
