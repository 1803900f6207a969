//! WebSocket transport layer.
//!
//! This module owns the single persistent connection to a debug target
//! and correlates requests with responses on it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Connection     │                              │  Debug target   │
//! │                 │         WebSocket            │                 │
//! │  Correlation    │◄────────────────────────────►│  Runtime /      │
//! │  EventBus       │    {id, method, params}      │  Debugger       │
//! │                 │                              │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - Handshake with the target endpoint
//! 2. `Connection::send` - Register a pending entry, transmit, await settlement
//! 3. Inbound events fan out to subscribers registered with `on`/`on_any`
//! 4. `Connection::disconnect` - Reject outstanding requests, close the socket
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `correlation` | Pending request table |
//! | `events` | Event subscription registry |
//! | `options` | Connection tuning |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// Event subscription registry.
pub mod events;

/// Connection options.
pub mod options;

mod correlation;

#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
pub use events::{EventBus, EventHandler, FaultHandler, TransportFault};
pub use options::ConnectOptions;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of a connection.
///
/// A connection never returns to `Connected`; reconnecting yields a new
/// [`Connection`] with its own id sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Requests may be sent.
    Connected,
    /// The socket is closed and the pending table flushed.
    Disconnected,
}

// ============================================================================
// Transport
// ============================================================================

/// Request/response seam used by the inspector.
///
/// Implemented by [`Connection`]; tests substitute scripted transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `method` with `params` and returns the response result.
    async fn send(&self, method: &str, params: Option<Value>) -> Result<Value>;
}
