//! Request and Response message types.
//!
//! Defines the wire format for correlated requests and their responses.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

// ============================================================================
// Request
// ============================================================================

/// A correlated request from the client to the target.
///
/// # Format
///
/// ```json
/// {
///   "id": 1,
///   "method": "Domain.methodName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Connection-scoped identifier for response correlation.
    pub id: RequestId,

    /// Method in `Domain.methodName` format.
    pub method: String,

    /// Method parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Creates a new request.
    #[inline]
    #[must_use]
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the target.
///
/// # Format
///
/// Success:
/// ```json
/// { "id": 1, "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": 1, "error": { "code": -32000, "message": "...", "data": ... } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result payload (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Structured error (if error).
    #[serde(default)]
    pub error: Option<ResponseError>,
}

/// Structured error carried by a response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseError {
    /// Error code.
    pub code: i64,

    /// Human-readable message.
    pub message: String,

    /// Additional error data.
    #[serde(default)]
    pub data: Option<Value>,
}

impl Response {
    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// A response with neither field resolves to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response carries an error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(error) => Err(Error::protocol(error.code, error.message, error.data)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
