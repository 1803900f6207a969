//! Event message types.
//!
//! Events are unsolicited notifications sent from the target. They never
//! carry an `id` and are routed by their `method` name.
//!
//! # Event Types
//!
//! | Domain | Events |
//! |--------|--------|
//! | `Debugger` | `paused`, `resumed`, `scriptParsed` |
//! | `Runtime` | `executionContextCreated`, `executionContextDestroyed`, `consoleAPICalled`, `exceptionThrown` |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::{CallFrameId, ScriptId};

// ============================================================================
// Event
// ============================================================================

/// An event notification from the target.
///
/// # Format
///
/// ```json
/// {
///   "method": "Domain.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event name in `Domain.eventName` format.
    pub method: String,

    /// Event-specific data.
    #[serde(default)]
    pub params: Value,

    /// Flattened-session identifier, when the target multiplexes sessions.
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

impl Event {
    /// Creates an event.
    #[inline]
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
            session_id: None,
        }
    }

    /// Returns the domain name from the method.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let event = Event::new("Debugger.paused", Value::Null);
    /// assert_eq!(event.domain(), "Debugger");
    /// ```
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Returns the event name from the method.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.method.split('.').nth(1).unwrap_or_default()
    }

    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        self.parse_internal()
    }
}

// ============================================================================
// Supporting Types
// ============================================================================

/// A position inside a script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Script containing the position.
    pub script_id: ScriptId,
    /// Zero-based line.
    pub line_number: u32,
    /// Zero-based column.
    #[serde(default)]
    pub column_number: Option<u32>,
}

/// A stack frame reported in `Debugger.paused`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Frame handle for `Debugger.evaluateOnCallFrame`.
    pub call_frame_id: CallFrameId,
    /// Name of the executing function (empty for anonymous).
    #[serde(default)]
    pub function_name: String,
    /// Current position in the frame.
    pub location: Location,
    /// Script URL.
    #[serde(default)]
    pub url: String,
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone)]
pub enum ParsedEvent {
    /// Execution paused.
    DebuggerPaused {
        /// Pause reason (`breakpoint`, `exception`, `other`, ...).
        reason: String,
        /// Stack at the pause point, innermost first.
        call_frames: Vec<CallFrame>,
        /// Breakpoints hit, if any.
        hit_breakpoints: Vec<String>,
    },

    /// Execution resumed.
    DebuggerResumed,

    /// Script parsed by the target.
    DebuggerScriptParsed {
        /// Script ID.
        script_id: ScriptId,
        /// Script URL.
        url: String,
        /// Source map URL, if the script declares one.
        source_map_url: Option<String>,
    },

    /// Execution context created.
    ExecutionContextCreated {
        /// Context ID.
        context_id: i64,
        /// Context origin.
        origin: String,
        /// Context name.
        name: String,
    },

    /// Execution context destroyed.
    ExecutionContextDestroyed {
        /// Context ID.
        context_id: i64,
    },

    /// Console API called inside the target.
    ConsoleApiCalled {
        /// Call type (`log`, `warn`, `error`, ...).
        call_type: String,
        /// Raw call arguments as remote objects.
        args: Vec<Value>,
    },

    /// Uncaught exception in the target.
    ExceptionThrown {
        /// Exception text.
        text: String,
        /// Exception description, if present.
        description: Option<String>,
    },

    /// Unknown event type.
    Unknown {
        /// Event method.
        method: String,
        /// Event params.
        params: Value,
    },
}

// ============================================================================
// Event Parsing Implementation
// ============================================================================

impl Event {
    /// Internal parsing implementation.
    fn parse_internal(&self) -> ParsedEvent {
        match self.method.as_str() {
            "Debugger.paused" => ParsedEvent::DebuggerPaused {
                reason: self.get_string_or("reason", "other"),
                call_frames: self.get_typed("callFrames").unwrap_or_default(),
                hit_breakpoints: self.get_typed("hitBreakpoints").unwrap_or_default(),
            },

            "Debugger.resumed" => ParsedEvent::DebuggerResumed,

            "Debugger.scriptParsed" => ParsedEvent::DebuggerScriptParsed {
                script_id: ScriptId::new(self.get_string("scriptId")),
                url: self.get_string("url"),
                source_map_url: self
                    .get_optional_string("sourceMapURL")
                    .filter(|url| !url.is_empty()),
            },

            "Runtime.executionContextCreated" => {
                let context = self.params.get("context").cloned().unwrap_or_default();
                ParsedEvent::ExecutionContextCreated {
                    context_id: context.get("id").and_then(Value::as_i64).unwrap_or_default(),
                    origin: str_field(&context, "origin"),
                    name: str_field(&context, "name"),
                }
            }

            "Runtime.executionContextDestroyed" => ParsedEvent::ExecutionContextDestroyed {
                context_id: self
                    .params
                    .get("executionContextId")
                    .and_then(Value::as_i64)
                    .unwrap_or_default(),
            },

            "Runtime.consoleAPICalled" => ParsedEvent::ConsoleApiCalled {
                call_type: self.get_string_or("type", "log"),
                args: self.get_typed("args").unwrap_or_default(),
            },

            "Runtime.exceptionThrown" => {
                let details = self
                    .params
                    .get("exceptionDetails")
                    .cloned()
                    .unwrap_or_default();
                ParsedEvent::ExceptionThrown {
                    text: str_field(&details, "text"),
                    description: details
                        .pointer("/exception/description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                }
            }

            _ => ParsedEvent::Unknown {
                method: self.method.clone(),
                params: self.params.clone(),
            },
        }
    }

    /// Gets a string from params.
    #[inline]
    fn get_string(&self, key: &str) -> String {
        str_field(&self.params, key)
    }

    /// Gets a string from params with default.
    #[inline]
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
            .to_string()
    }

    /// Gets an optional string from params.
    #[inline]
    fn get_optional_string(&self, key: &str) -> Option<String> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Deserializes a params field, ignoring shape mismatches.
    fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.params
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Reads a string field, defaulting to empty.
fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================
