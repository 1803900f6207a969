//! In-process WebSocket target for tests.
//!
//! Accepts one client, forwards every request it receives to the test,
//! and writes whatever frames the test queues.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on waiting for a request in tests.
const REQUEST_WAIT: Duration = Duration::from_secs(5);

// ============================================================================
// MockTarget
// ============================================================================

/// Scripted far end of a connection.
pub(crate) struct MockTarget {
    url: String,
    requests: mpsc::UnboundedReceiver<Value>,
    frames: mpsc::UnboundedSender<Message>,
}

impl MockTarget {
    /// Binds to a random localhost port and starts accepting.
    pub async fn start() -> Self {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        let (request_tx, requests) = mpsc::unbounded_channel();
        let (frames, mut frame_rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(ws_stream) = tokio_tungstenite::accept_async(stream).await else {
                return;
            };
            let (mut write, mut read) = ws_stream.split();

            loop {
                tokio::select! {
                    message = read.next() => match message {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(value) = serde_json::from_str::<Value>(&text) {
                                let _ = request_tx.send(value);
                            }
                        }
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        _ => {}
                    },

                    frame = frame_rx.recv() => match frame {
                        Some(Message::Close(close)) => {
                            let _ = write.send(Message::Close(close)).await;
                            break;
                        }
                        Some(frame) => {
                            if write.send(frame).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        Self {
            url: format!("ws://127.0.0.1:{port}"),
            requests,
            frames,
        }
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Waits for the next request the client sent.
    pub async fn next_request(&mut self) -> Value {
        timeout(REQUEST_WAIT, self.requests.recv())
            .await
            .expect("request should arrive")
            .expect("target task alive")
    }

    /// Sends a raw text frame.
    pub fn send_raw(&self, text: impl Into<String>) {
        let text: String = text.into();
        let _ = self.frames.send(Message::Text(text.into()));
    }

    /// Sends a success response.
    pub fn reply(&self, id: u64, result: Value) {
        self.send_raw(json!({ "id": id, "result": result }).to_string());
    }

    /// Sends an error response.
    pub fn reply_error(&self, id: u64, code: i64, message: &str) {
        self.send_raw(json!({ "id": id, "error": { "code": code, "message": message } }).to_string());
    }

    /// Sends an event.
    pub fn emit(&self, method: &str, params: Value) {
        self.send_raw(json!({ "method": method, "params": params }).to_string());
    }

    /// Sends a binary frame.
    pub fn send_binary(&self, bytes: Vec<u8>) {
        let _ = self.frames.send(Message::Binary(bytes.into()));
    }

    /// Closes the connection from the target side.
    pub fn close(&self) {
        let _ = self.frames.send(Message::Close(None));
    }
}

/// Routes `tracing` output to the test harness when `RUST_LOG` is set.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
