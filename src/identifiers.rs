//! Type-safe identifiers for protocol entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.
//!
//! | Type | Wire form | Scope |
//! |------|-----------|-------|
//! | [`RequestId`] | integer | one connection |
//! | [`RemoteObjectId`] | string | one execution context |
//! | [`CallFrameId`] | string | one pause |
//! | [`ScriptId`] | string | one target |
//! | [`SubscriptionId`] | (local only) | one connection |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// RequestId
// ============================================================================

/// Identifier correlating a request with its response.
///
/// Allocated by the connection, strictly increasing, never reused
/// within one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Creates a request ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the ID following this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// String-backed IDs
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from its wire form.
            #[inline]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the wire form.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Opaque handle to a value living in the target's heap.
    ///
    /// Valid only while the owning execution context is alive.
    RemoteObjectId
}

string_id! {
    /// Reference to a stack frame of a paused target.
    CallFrameId
}

string_id! {
    /// Identifier of a script parsed by the target.
    ScriptId
}

// ============================================================================
// SubscriptionId
// ============================================================================

/// Handle returned by event subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a subscription ID from its raw value.
    #[inline]
    #[must_use]
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_next_is_increasing() {
        let first = RequestId::new(1);
        assert_eq!(first.next().get(), 2);
        assert!(first < first.next());
    }

    #[test]
    fn test_request_id_serializes_as_integer() {
        let json = serde_json::to_string(&RequestId::new(42)).expect("serialize");
        assert_eq!(json, "42");

        let id: RequestId = serde_json::from_str("42").expect("parse");
        assert_eq!(id, RequestId::new(42));
    }

    #[test]
    fn test_remote_object_id_is_transparent() {
        let id = RemoteObjectId::new("{\"injectedScriptId\":1,\"id\":3}");
        let json = serde_json::to_string(&id).expect("serialize");
        let back: RemoteObjectId = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.as_str(), id.as_str());
    }

    #[test]
    fn test_display() {
        assert_eq!(CallFrameId::from("frame-1").to_string(), "frame-1");
        assert_eq!(SubscriptionId::new(3).to_string(), "sub-3");
    }
}
