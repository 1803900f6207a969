//! Error types for the DevTools inspector client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use devtools_inspector::{Client, Result};
//!
//! async fn example(client: &Client) -> Result<()> {
//!     let value = client.evaluate_global("1 + 1").await?;
//!     println!("{value:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::NotConnected`], [`Error::Disconnected`] |
//! | Protocol | [`Error::Protocol`], [`Error::InvalidResponse`], [`Error::TooManyPending`] |
//! | Timing | [`Error::RequestTimeout`] |
//! | Resolver | [`Error::Evaluation`], [`Error::PropertyAccess`], [`Error::NoActiveFrame`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{RemoteObjectId, RequestId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when client or connection options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Connection could not be established.
    ///
    /// Returned by `connect` when the endpoint is invalid or the
    /// WebSocket handshake fails. Not retried by this crate.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Handshake did not complete in time.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// A request was issued on a connection that is not connected.
    #[error("Not connected")]
    NotConnected,

    /// The connection dropped while the request was outstanding.
    #[error("Disconnected while request was pending")]
    Disconnected,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Structured error reported by the far end, surfaced verbatim.
    #[error("Protocol error {code}: {message}")]
    Protocol {
        /// Error code from the response.
        code: i64,
        /// Error message from the response.
        message: String,
        /// Optional error data from the response.
        data: Option<Value>,
    },

    /// A response did not have the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of what was wrong.
        message: String,
    },

    /// Too many outstanding requests on one connection.
    #[error("Too many pending requests: {pending}/{max}")]
    TooManyPending {
        /// Requests currently outstanding.
        pending: usize,
        /// Configured limit.
        max: usize,
    },

    // ========================================================================
    // Timing Errors
    // ========================================================================
    /// Request deadline elapsed before a response arrived.
    #[error("Request {request_id} ({method}) timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Protocol method of the request.
        method: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Resolver Errors
    // ========================================================================
    /// The evaluated expression threw inside the target.
    #[error("Evaluation failed: {description}")]
    Evaluation {
        /// Description supplied by the target.
        description: String,
    },

    /// Enumerating properties of a remote object failed.
    #[error("Failed to read properties of {object_id}: {source}")]
    PropertyAccess {
        /// Object whose properties were requested.
        object_id: RemoteObjectId,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// No call frame was given and none is available.
    #[error("No active call frame")]
    NoActiveFrame,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            data,
        }
    }

    /// Creates an invalid response error.
    #[inline]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, method: impl Into<String>, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            method: method.into(),
            timeout_ms,
        }
    }

    /// Creates an evaluation error.
    #[inline]
    pub fn evaluation(description: impl Into<String>) -> Self {
        Self::Evaluation {
            description: description.into(),
        }
    }

    /// Wraps a lower-layer failure as a property access error.
    #[inline]
    pub fn property_access(object_id: RemoteObjectId, source: Error) -> Self {
        Self::PropertyAccess {
            object_id,
            source: Box::new(source),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::NotConnected
                | Self::Disconnected
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error was raised by the value resolver.
    #[inline]
    #[must_use]
    pub fn is_resolver_error(&self) -> bool {
        matches!(
            self,
            Self::Evaluation { .. } | Self::PropertyAccess { .. } | Self::NoActiveFrame
        )
    }

    /// Returns the protocol error code, if this is a protocol error.
    #[inline]
    #[must_use]
    pub fn protocol_code(&self) -> Option<i64> {
        match self {
            Self::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("handshake refused");
        assert_eq!(err.to_string(), "Connection failed: handshake refused");
    }

    #[test]
    fn test_protocol_error_display() {
        let err = Error::protocol(-32000, "Cannot find context", None);
        assert_eq!(err.to_string(), "Protocol error -32000: Cannot find context");
        assert_eq!(err.protocol_code(), Some(-32000));
    }

    #[test]
    fn test_request_timeout_display() {
        let err = Error::request_timeout(RequestId::new(7), "Runtime.evaluate", 50);
        assert_eq!(
            err.to_string(),
            "Request 7 (Runtime.evaluate) timed out after 50ms"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::NotConnected.is_connection_error());
        assert!(Error::Disconnected.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_property_access_keeps_source() {
        let err = Error::property_access(RemoteObjectId::new("obj-1"), Error::Disconnected);
        assert!(err.is_resolver_error());
        assert!(err.to_string().contains("obj-1"));

        let source = std::error::Error::source(&err).expect("has source");
        assert_eq!(source.to_string(), Error::Disconnected.to_string());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
