//! DevTools protocol message types.
//!
//! This module defines the wire format spoken over the WebSocket
//! connection to the debug target.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Client → Target | Correlated command (`id`, `method`, `params`) |
//! | `Response` | Target → Client | `result` or structured `error` for an `id` |
//! | `Event` | Target → Client | Notification (`method`, `params`), never has an `id` |
//!
//! # Command Naming
//!
//! Methods follow `Domain.methodName` format:
//!
//! - `Runtime.evaluate`
//! - `Runtime.getProperties`
//! - `Debugger.evaluateOnCallFrame`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Typed command definitions by domain |
//! | `event` | Event types and typed parsing |
//! | `message` | Inbound demultiplexing |
//! | `request` | Request and Response types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by domain.
pub mod command;

/// Event message types.
pub mod event;

/// Inbound message parsing.
pub mod message;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, DebuggerCommand, RuntimeCommand};
pub use event::{CallFrame, Event, Location, ParsedEvent};
pub use message::Message;
pub use request::{Request, Response, ResponseError};
