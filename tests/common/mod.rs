//! Shared mock servers for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a login endpoint that serves each scripted `(status, body)` pair to
/// one connection, then drops its listener so later probes get connection
/// refused.
#[allow(dead_code)]
pub async fn start_scripted_login(responses: Vec<(u16, String)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;

            let status_text = match status {
                200 => "200 OK",
                500 => "500 Internal Server Error",
                503 => "503 Service Unavailable",
                _ => "400 Bad Request",
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_text,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        // Listener drops here; everything after the script is refused.
    });

    addr
}

/// Accept connections and never answer them; probes against this address run
/// into their timeout.
#[allow(dead_code)]
pub async fn start_black_hole() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Mock Telegram API capturing every sendMessage payload.
#[allow(dead_code)]
pub async fn start_telegram_capture() -> (SocketAddr, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/{bot}/sendMessage", post(capture))
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, captured)
}

async fn capture(State(captured): State<Captured>, Json(message): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(message);
    Json(json!({ "ok": true }))
}
