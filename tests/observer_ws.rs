//! Observer channel tests against a raw mock WebSocket server
//!
//! Simulates the upstream realtime control endpoint with a plain
//! `tokio_tungstenite::accept_hdr_async` loop and drives the attacher
//! end-to-end: settle delay, single directive, event streaming, lifetime
//! budget, and transport failure.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

use callbridge::core::observer::{self, ObserverConfig};

fn observer_config(ws_url: String) -> ObserverConfig {
    ObserverConfig {
        ws_url,
        api_key: "test_openai_key".to_string(),
        settle_delay: Duration::from_millis(100),
        max_lifetime: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_observer_sends_one_directive_after_settle_delay() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handshake: Arc<Mutex<Option<(String, Option<String>)>>> = Arc::new(Mutex::new(None));
    let handshake_capture = handshake.clone();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let opened = Instant::now();
        let ws = accept_hdr_async(stream, move |req: &Request, resp: Response| {
            let auth = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            *handshake_capture.lock().unwrap() = Some((req.uri().to_string(), auth));
            Ok::<Response, ErrorResponse>(resp)
        })
        .await
        .unwrap();
        let (mut write, mut read) = ws.split();

        let first = read.next().await.unwrap().unwrap();
        let directive_delay = opened.elapsed();

        // Spam transcript deltas, then a terminal event, then close.
        for i in 0..50 {
            let delta = json!({
                "type": "response.audio_transcript.delta",
                "delta": format!("chunk-{i}"),
            });
            write
                .send(Message::Text(delta.to_string().into()))
                .await
                .unwrap();
        }
        write
            .send(Message::Text(
                json!({"type": "response.done", "response": {}}).to_string().into(),
            ))
            .await
            .unwrap();
        write.send(Message::Close(None)).await.unwrap();
        while let Some(msg) = read.next().await {
            if msg.is_err() {
                break;
            }
        }

        (first, directive_delay)
    });

    observer::attach(
        "call_ws_test".to_string(),
        observer_config(format!("ws://{addr}/")),
    )
    .await;

    let (first, directive_delay) = server.await.unwrap();
    let directive: serde_json::Value =
        serde_json::from_str(first.to_text().unwrap()).unwrap();
    assert_eq!(directive, json!({"type": "response.create"}));
    assert!(directive_delay >= Duration::from_millis(100));

    let (uri, auth) = handshake.lock().unwrap().clone().unwrap();
    assert!(uri.ends_with("?call_id=call_ws_test"));
    assert_eq!(auth.as_deref(), Some("Bearer test_openai_key"));
}

#[tokio::test]
async fn test_observer_lifetime_budget_ends_a_silent_channel() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Server accepts, reads the directive, then goes silent without closing.
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_hdr_async(stream, |_req: &Request, resp: Response| {
            Ok::<Response, ErrorResponse>(resp)
        })
        .await
        .unwrap();
        let (_write, mut read) = ws.split();
        let _ = read.next().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let mut config = observer_config(format!("ws://{addr}/"));
    config.max_lifetime = Duration::from_millis(300);

    let started = Instant::now();
    tokio::time::timeout(
        Duration::from_secs(3),
        observer::attach("call_budget".to_string(), config),
    )
    .await
    .expect("observer did not honor its lifetime budget");
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_observer_connect_failure_is_swallowed() {
    // Bind and immediately drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    // Terminal for this instance: attach returns after logging, no retry.
    tokio::time::timeout(
        Duration::from_secs(5),
        observer::attach(
            "call_unreachable".to_string(),
            observer_config(format!("ws://{addr}")),
        ),
    )
    .await
    .expect("failed connect should terminate the observer promptly");
}
