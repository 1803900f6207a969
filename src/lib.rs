//! DevTools inspector - protocol client core for remote debugging.
//!
//! This library speaks a JSON request/response/event protocol compatible
//! with the Chrome DevTools Protocol over a single WebSocket connection,
//! and resolves remote values into local structures.
//!
//! # Architecture
//!
//! The client is built from two layers:
//!
//! - **Transport**: assigns request ids, tracks outstanding requests,
//!   and routes inbound messages to callers (by id) or subscribers (by method)
//! - **Inspector**: evaluates expressions, lists properties, and expands
//!   remote object graphs to a bounded depth
//!
//! Key design principles:
//!
//! - Each [`Connection`] owns: WebSocket + pending table + event loop
//! - The inspector sees only the [`Transport`] seam, never the socket
//! - Deadlines are per request; disconnect rejects everything at once
//! - No retries: resilience policies wrap this crate, not the other way
//!
//! # Quick Start
//!
//! ```no_run
//! use devtools_inspector::{Client, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::builder()
//!         .endpoint("ws://127.0.0.1:9229/7d6c1b2e")
//!         .connect()
//!         .await?;
//!
//!     let value = client.evaluate_global("({ a: 1, b: [1, 2] })").await?;
//!     let tree = client.inspect(&value).await?;
//!     println!("{}", tree.to_json());
//!
//!     client.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Client`] façade and [`ClientBuilder`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`inspector`] | Remote value resolver |
//! | [`protocol`] | Wire message types |
//! | [`transport`] | WebSocket connection and correlation |

// ============================================================================
// Modules
// ============================================================================

/// High-level client façade.
///
/// Use [`Client::builder()`] to create a connected client.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for protocol entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Remote value resolver.
///
/// Evaluation, property listing and bounded graph expansion.
pub mod inspector;

/// Wire message types.
///
/// Requests, responses, events and typed commands.
pub mod protocol;

/// WebSocket transport layer.
///
/// Connection, request correlation and event routing.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{CallFrameId, RemoteObjectId, RequestId, ScriptId, SubscriptionId};

// Inspector types
pub use inspector::{
    FrameSource, InspectedProperty, InspectedValue, Inspector, ListOptions, NameMapper,
    NameTable, PropertyDescriptor, ResolvedValue, SourceLocation, ValueKind,
};

// Protocol types
pub use protocol::{Command, DebuggerCommand, Event, ParsedEvent, RuntimeCommand};

// Transport types
pub use transport::{ConnectOptions, Connection, ConnectionState, Transport, TransportFault};
