//! WebSocket connection and event loop.
//!
//! This module handles the WebSocket connection to the debug target,
//! including request/response correlation and event routing.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming messages from the target (responses, events)
//! - Outgoing requests from the Rust API
//! - Request/response correlation by integer id
//! - Event and fault fan-out to subscribers
//!
//! Deadlines are enforced on the caller side; the event loop never
//! blocks on a slow request.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, to_string};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, SubscriptionId};
use crate::protocol::{Command, Event, Message, Request};

use super::correlation::{CorrelationTable, PendingGuard, reject_disconnected};
use super::events::{EventBus, TransportFault};
use super::{ConnectOptions, ConnectionState, Transport};

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Transmit a registered request.
    Send(Request),
    /// Close the socket, then acknowledge.
    Shutdown { done: oneshot::Sender<()> },
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to a debug target.
///
/// Handles request/response correlation and event routing.
/// The connection spawns an internal event loop task.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and cheap to clone; clones share the
/// same socket, pending table and subscribers. The event loop stops when
/// [`Connection::disconnect`] is called or the last clone is dropped.
#[derive(Clone)]
pub struct Connection {
    /// Endpoint this connection was opened against.
    endpoint: Arc<str>,
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Pending request table (shared with event loop).
    correlation: Arc<Mutex<CorrelationTable>>,
    /// Event subscribers (shared with event loop).
    events: Arc<EventBus>,
    /// Timeout used by [`Connection::send`].
    request_timeout: Duration,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Connection - Establishment
// ============================================================================

impl Connection {
    /// Connects to `endpoint` with default options.
    ///
    /// Resolves once the WebSocket handshake completed.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the endpoint is invalid or the handshake fails
    /// - [`Error::ConnectionTimeout`] if the handshake takes too long
    pub async fn connect(endpoint: &str) -> Result<Self> {
        Self::connect_with(endpoint, ConnectOptions::default()).await
    }

    /// Connects to `endpoint` with custom options.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `options` are invalid
    /// - [`Error::Connection`] if the endpoint is invalid or the handshake fails
    /// - [`Error::ConnectionTimeout`] if the handshake takes too long
    pub async fn connect_with(endpoint: &str, options: ConnectOptions) -> Result<Self> {
        options.validate()?;
        let url = parse_endpoint(endpoint)?;

        debug!(%url, "Connecting");

        let (ws_stream, _) = timeout(options.connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| Error::connection_timeout(options.connect_timeout.as_millis() as u64))?
            .map_err(|e| Error::connection(format!("WebSocket handshake with {url} failed: {e}")))?;

        info!(%url, "WebSocket connection established");

        Ok(Self::from_stream(ws_stream, url.as_str(), &options))
    }

    /// Creates a connection from an established WebSocket stream.
    ///
    /// Spawns the event loop task internally. Must be called within a
    /// tokio runtime.
    pub fn from_stream<S>(
        ws_stream: WebSocketStream<S>,
        endpoint: &str,
        options: &ConnectOptions,
    ) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationTable::new(options.max_pending)));
        let events = Arc::new(EventBus::new());

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
            Arc::clone(&events),
        ));

        Self {
            endpoint: Arc::from(endpoint),
            command_tx,
            correlation,
            events,
            request_timeout: options.request_timeout,
        }
    }
}

// ============================================================================
// Connection - Requests
// ============================================================================

impl Connection {
    /// Sends a request and waits for its result with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_with_timeout`].
    pub async fn send(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.send_with_timeout(method, params, self.request_timeout)
            .await
    }

    /// Sends a request and waits for its result with a custom timeout.
    ///
    /// # Arguments
    ///
    /// * `method` - Protocol method, e.g. `Runtime.evaluate`
    /// * `params` - Method parameters
    /// * `request_timeout` - Maximum time to wait for the response
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the target answered with an error
    /// - [`Error::RequestTimeout`] if no response arrived in time
    /// - [`Error::NotConnected`] if the connection is already closed
    /// - [`Error::Disconnected`] if the connection closed while waiting
    /// - [`Error::TooManyPending`] if too many requests are outstanding
    pub async fn send_with_timeout(
        &self,
        method: &str,
        params: Option<Value>,
        request_timeout: Duration,
    ) -> Result<Value> {
        let (request_id, response_rx) = self.correlation.lock().register(method, request_timeout)?;
        // Removes the entry on every exit, including this future being dropped.
        let _guard = PendingGuard::new(Arc::clone(&self.correlation), request_id);

        let request = Request::new(request_id, method, params);
        if self.command_tx.send(ConnectionCommand::Send(request)).is_err() {
            return Err(Error::Disconnected);
        }

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(Error::Disconnected),
            Err(_) => {
                // Once removed, a late response finds no entry and is dropped.
                self.correlation.lock().remove(request_id);
                debug!(%request_id, method, "Request timed out");

                Err(Error::request_timeout(
                    request_id,
                    method,
                    request_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Sends a typed command with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_with_timeout`].
    pub async fn send_command(&self, command: impl Into<Command>) -> Result<Value> {
        let (method, params) = command.into().into_parts()?;
        self.send(&method, params).await
    }

    /// Closes the connection.
    ///
    /// Every outstanding request fails with [`Error::Disconnected`], then
    /// the socket is closed. Further sends fail with [`Error::NotConnected`].
    pub async fn disconnect(&self) {
        let drained = self.correlation.lock().close();
        let rejected = reject_disconnected(drained);

        let (done_tx, done_rx) = oneshot::channel();
        if self
            .command_tx
            .send(ConnectionCommand::Shutdown { done: done_tx })
            .is_ok()
        {
            let _ = done_rx.await;
        }

        info!(endpoint = %self.endpoint, rejected, "Disconnected");
    }
}

// ============================================================================
// Connection - Events
// ============================================================================

impl Connection {
    /// Subscribes `handler` to events named `method`.
    pub fn on<F>(&self, method: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.on(method, Arc::new(handler))
    }

    /// Subscribes `handler` to every event.
    pub fn on_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.on_any(Arc::new(handler))
    }

    /// Subscribes `handler` to transport faults.
    pub fn on_error<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&TransportFault) + Send + Sync + 'static,
    {
        self.events.on_error(Arc::new(handler))
    }

    /// Removes a subscription. Returns `true` if it existed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    /// Returns a channel receiving events named `method`, or every event
    /// when `method` is `None`.
    ///
    /// Pass the returned id to [`Connection::off`] to stop delivery.
    pub fn events(
        &self,
        method: Option<&str>,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let forward = move |event: &Event| {
            let _ = tx.send(event.clone());
        };

        let id = match method {
            Some(method) => self.on(method, forward),
            None => self.on_any(forward),
        };
        (id, rx)
    }
}

// ============================================================================
// Connection - Accessors
// ============================================================================

impl Connection {
    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.correlation.lock().state()
    }

    /// Returns `true` while the connection accepts requests.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Returns `true` if `id` is still awaiting a response.
    #[inline]
    #[must_use]
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.correlation.lock().contains(id)
    }
}

// ============================================================================
// Connection - Event Loop
// ============================================================================

impl Connection {
    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationTable>>,
        events: Arc<EventBus>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();
        let mut shutdown_ack = None;

        loop {
            tokio::select! {
                // Incoming messages from target
                message = ws_read.next() => {
                    match message {
                        Some(Ok(WsMessage::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation, &events);
                        }

                        Some(Ok(WsMessage::Binary(_))) => {
                            warn!("Ignoring binary frame");
                            events.report(&TransportFault::UnexpectedFrame { kind: "binary" });
                        }

                        Some(Ok(WsMessage::Close(frame))) => {
                            debug!(?frame, "WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            events.report(&TransportFault::Socket { message: e.to_string() });
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Ping, Pong, raw frames
                        _ => {}
                    }
                }

                // Commands from Rust API
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(request)) => {
                            Self::handle_send_command(request, &mut ws_write, &correlation).await;
                        }

                        Some(ConnectionCommand::Shutdown { done }) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            shutdown_ack = Some(done);
                            break;
                        }

                        None => {
                            debug!("All connection handles dropped");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        let drained = correlation.lock().close();
        reject_disconnected(drained);

        if let Some(done) = shutdown_ack {
            let _ = done.send(());
        }

        debug!("Event loop terminated");
    }

    /// Handles an incoming text frame from the target.
    fn handle_incoming_message(
        text: &str,
        correlation: &Mutex<CorrelationTable>,
        events: &EventBus,
    ) {
        match Message::parse(text) {
            Ok(Message::Response(response)) => {
                let id = response.id;
                correlation.lock().settle(id, response.into_result());
            }

            Ok(Message::Event(event)) => {
                events.publish(&event);
            }

            Err(reason) => {
                warn!(%reason, "Failed to parse incoming message");
                events.report(&TransportFault::MalformedFrame {
                    text: text.to_string(),
                    reason,
                });
            }
        }
    }

    /// Transmits a registered request.
    async fn handle_send_command<S>(
        request: Request,
        ws_write: &mut SplitSink<WebSocketStream<S>, WsMessage>,
        correlation: &Mutex<CorrelationTable>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let request_id = request.id;

        let json = match to_string(&request) {
            Ok(json) => json,
            Err(e) => {
                if let Some(entry) = correlation.lock().remove(request_id) {
                    let _ = entry.sender.send(Err(Error::Json(e)));
                }
                return;
            }
        };

        if let Err(e) = ws_write.send(WsMessage::Text(json.into())).await {
            warn!(%request_id, error = %e, "Failed to transmit request");
            if let Some(entry) = correlation.lock().remove(request_id) {
                let _ = entry.sender.send(Err(Error::WebSocket(e)));
            }
            return;
        }

        trace!(%request_id, method = %request.method, "Request sent");
    }
}

// ============================================================================
// Transport
// ============================================================================

#[async_trait]
impl Transport for Connection {
    async fn send(&self, method: &str, params: Option<Value>) -> Result<Value> {
        Connection::send(self, method, params).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses and checks a `ws://` or `wss://` endpoint.
fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::connection(format!("invalid endpoint `{endpoint}`: {e}")))?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(Error::connection(format!(
            "unsupported scheme `{other}`, expected ws or wss"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
