//! Core Client struct.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::identifiers::{CallFrameId, RemoteObjectId, SubscriptionId};
use crate::inspector::{InspectedValue, Inspector, ListOptions, PropertyDescriptor, ResolvedValue};
use crate::protocol::{Command, Event};
use crate::transport::{Connection, TransportFault};

use super::builder::ClientBuilder;

// ============================================================================
// Client
// ============================================================================

/// Connected debug client.
///
/// Combines a [`Connection`] with an [`Inspector`] built on it. Cheap to
/// clone; clones share the connection.
#[derive(Clone)]
pub struct Client {
    connection: Connection,
    inspector: Inspector,
    max_depth: usize,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(connection: Connection, inspector: Inspector, max_depth: usize) -> Self {
        Self {
            connection,
            inspector,
            max_depth,
        }
    }
}

// ============================================================================
// Client - Accessors
// ============================================================================

impl Client {
    /// Returns the underlying connection.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Returns the value resolver.
    #[inline]
    #[must_use]
    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    /// Returns the default inspection depth.
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` while the connection accepts requests.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}

// ============================================================================
// Client - Requests
// ============================================================================

impl Client {
    /// Sends a raw request with the default timeout.
    pub async fn send(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.connection.send(method, params).await
    }

    /// Sends a raw request with a custom timeout.
    pub async fn send_with_timeout(
        &self,
        method: &str,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value> {
        self.connection
            .send_with_timeout(method, params, timeout)
            .await
    }

    /// Sends a typed command.
    pub async fn send_command(&self, command: impl Into<Command>) -> Result<Value> {
        self.connection.send_command(command).await
    }

    /// Closes the connection, rejecting outstanding requests.
    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }
}

// ============================================================================
// Client - Inspection
// ============================================================================

impl Client {
    /// See [`Inspector::evaluate`].
    pub async fn evaluate(
        &self,
        expression: &str,
        frame: Option<&CallFrameId>,
    ) -> Result<ResolvedValue> {
        self.inspector.evaluate(expression, frame).await
    }

    /// See [`Inspector::evaluate_global`].
    pub async fn evaluate_global(&self, expression: &str) -> Result<ResolvedValue> {
        self.inspector.evaluate_global(expression).await
    }

    /// See [`Inspector::list_properties`].
    pub async fn list_properties(
        &self,
        object_id: &RemoteObjectId,
        options: &ListOptions,
    ) -> Result<Vec<PropertyDescriptor>> {
        self.inspector.list_properties(object_id, options).await
    }

    /// Inspects `value` to the configured default depth.
    pub async fn inspect(&self, value: &ResolvedValue) -> Result<InspectedValue> {
        self.inspector.inspect(value, self.max_depth).await
    }

    /// Inspects `value` to `max_depth`.
    pub async fn inspect_depth(
        &self,
        value: &ResolvedValue,
        max_depth: usize,
    ) -> Result<InspectedValue> {
        self.inspector.inspect(value, max_depth).await
    }
}

// ============================================================================
// Client - Events
// ============================================================================

impl Client {
    /// See [`Connection::on`].
    pub fn on<F>(&self, method: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.connection.on(method, handler)
    }

    /// See [`Connection::on_any`].
    pub fn on_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.connection.on_any(handler)
    }

    /// See [`Connection::on_error`].
    pub fn on_error<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&TransportFault) + Send + Sync + 'static,
    {
        self.connection.on_error(handler)
    }

    /// See [`Connection::off`].
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.connection.off(id)
    }

    /// See [`Connection::events`].
    pub fn events(&self, method: Option<&str>) -> (SubscriptionId, mpsc::UnboundedReceiver<Event>) {
        self.connection.events(method)
    }
}

// ============================================================================
// Tests
// ============================================================================
