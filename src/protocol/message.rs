//! Inbound message demultiplexing.
//!
//! Every inbound frame is one self-contained JSON document. Documents with
//! an `id` are responses; documents with a `method` and no `id` are events.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use super::{Event, Response};

// ============================================================================
// Message
// ============================================================================

/// A parsed inbound protocol message.
#[derive(Debug, Clone)]
pub enum Message {
    /// Response to a correlated request.
    Response(Response),
    /// Unsolicited event.
    Event(Event),
}

impl Message {
    /// Parses one inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns a description of why the frame is malformed.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;

        if !value.is_object() {
            return Err("message is not a JSON object".to_string());
        }

        if value.get("id").is_some() {
            return serde_json::from_value(value)
                .map(Self::Response)
                .map_err(|e| format!("invalid response: {e}"));
        }

        if value.get("method").is_some() {
            return serde_json::from_value(value)
                .map(Self::Event)
                .map_err(|e| format!("invalid event: {e}"));
        }

        Err("message has neither `id` nor `method`".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
