//! Remote value representation.
//!
//! The target describes every value as a `RemoteObject` discriminated by
//! its `type` and optional `subtype`. [`ValueKind::from_protocol`] is the
//! single table mapping those names to structured kinds.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::RemoteObjectId;

// ============================================================================
// ValueKind
// ============================================================================

/// Structured kind of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
    Function,
    Object,
    Array,
    Error,
    Date,
    RegExp,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Promise,
    Proxy,
    Iterator,
    Generator,
    TypedArray,
    ArrayBuffer,
    DataView,
    Node,
}

impl ValueKind {
    /// Maps a protocol `type`/`subtype` pair to a kind.
    ///
    /// Unknown object subtypes fall back to [`ValueKind::Object`].
    #[must_use]
    pub fn from_protocol(type_name: &str, subtype: Option<&str>) -> Self {
        match (type_name, subtype) {
            ("undefined", _) => Self::Undefined,
            ("boolean", _) => Self::Boolean,
            ("number", _) => Self::Number,
            ("string", _) => Self::String,
            ("bigint", _) => Self::BigInt,
            ("symbol", _) => Self::Symbol,
            ("function", _) => Self::Function,
            ("object", Some("null")) => Self::Null,
            ("object", Some("array")) => Self::Array,
            ("object", Some("error")) => Self::Error,
            ("object", Some("date")) => Self::Date,
            ("object", Some("regexp")) => Self::RegExp,
            ("object", Some("map")) => Self::Map,
            ("object", Some("set")) => Self::Set,
            ("object", Some("weakmap")) => Self::WeakMap,
            ("object", Some("weakset")) => Self::WeakSet,
            ("object", Some("promise")) => Self::Promise,
            ("object", Some("proxy")) => Self::Proxy,
            ("object", Some("iterator")) => Self::Iterator,
            ("object", Some("generator")) => Self::Generator,
            ("object", Some("typedarray")) => Self::TypedArray,
            ("object", Some("arraybuffer")) => Self::ArrayBuffer,
            ("object", Some("dataview")) => Self::DataView,
            ("object", Some("node")) => Self::Node,
            _ => Self::Object,
        }
    }

    /// Returns `true` for kinds copied by value.
    #[inline]
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Undefined
                | Self::Null
                | Self::Boolean
                | Self::Number
                | Self::String
                | Self::BigInt
        )
    }

    /// Lowercase protocol-style name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Function => "function",
            Self::Object => "object",
            Self::Array => "array",
            Self::Error => "error",
            Self::Date => "date",
            Self::RegExp => "regexp",
            Self::Map => "map",
            Self::Set => "set",
            Self::WeakMap => "weakmap",
            Self::WeakSet => "weakset",
            Self::Promise => "promise",
            Self::Proxy => "proxy",
            Self::Iterator => "iterator",
            Self::Generator => "generator",
            Self::TypedArray => "typedarray",
            Self::ArrayBuffer => "arraybuffer",
            Self::DataView => "dataview",
            Self::Node => "node",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Value descriptor as sent by the target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

/// Exception report attached to a failed evaluation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExceptionDetails {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Description of the thrown value, falling back to the summary text.
    pub fn description(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

/// Result of `Runtime.evaluate` and `Debugger.evaluateOnCallFrame`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EvaluationResult {
    pub result: RemoteObject,
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

// ============================================================================
// ResolvedValue
// ============================================================================

/// Local representation of a remote value.
///
/// Primitives are copied; everything else keeps a handle for further
/// inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// Value copied from the target.
    Primitive {
        kind: ValueKind,
        /// JSON form; `Null` for `undefined` and unserializable numbers.
        value: Value,
        /// `NaN`, `Infinity`, `-0`, or a bigint literal.
        unserializable: Option<String>,
        description: Option<String>,
    },

    /// Value living in the target's heap.
    Remote {
        kind: ValueKind,
        object_id: RemoteObjectId,
        class_name: Option<String>,
        description: Option<String>,
    },
}

impl ResolvedValue {
    /// The `undefined` value.
    #[must_use]
    pub fn undefined() -> Self {
        Self::Primitive {
            kind: ValueKind::Undefined,
            value: Value::Null,
            unserializable: None,
            description: None,
        }
    }

    /// Returns the value kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Primitive { kind, .. } | Self::Remote { kind, .. } => *kind,
        }
    }

    /// Returns the remote handle, if any.
    #[inline]
    #[must_use]
    pub fn object_id(&self) -> Option<&RemoteObjectId> {
        match self {
            Self::Remote { object_id, .. } => Some(object_id),
            Self::Primitive { .. } => None,
        }
    }

    /// Returns the target-supplied description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Primitive { description, .. } | Self::Remote { description, .. } => {
                description.as_deref()
            }
        }
    }

    /// Returns `true` if the value is a remote handle.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Renders the value as plain JSON.
    ///
    /// Unserializable primitives become their literal string; remote
    /// values become their description.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Primitive {
                unserializable: Some(literal),
                ..
            } => Value::String(literal.clone()),
            Self::Primitive { value, .. } => value.clone(),
            Self::Remote {
                kind,
                class_name,
                description,
                ..
            } => Value::String(
                description
                    .clone()
                    .or_else(|| class_name.clone())
                    .unwrap_or_else(|| kind.to_string()),
            ),
        }
    }
}

impl From<RemoteObject> for ResolvedValue {
    fn from(remote: RemoteObject) -> Self {
        let kind = ValueKind::from_protocol(&remote.type_name, remote.subtype.as_deref());

        match remote.object_id {
            Some(object_id) => Self::Remote {
                kind,
                object_id,
                class_name: remote.class_name,
                description: remote.description,
            },
            None => Self::Primitive {
                kind,
                value: remote.value.unwrap_or(Value::Null),
                unserializable: remote.unserializable_value,
                description: remote.description,
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn parse(value: Value) -> ResolvedValue {
        serde_json::from_value::<RemoteObject>(value)
            .expect("remote object")
            .into()
    }

    #[test]
    fn test_kind_table() {
        assert_eq!(ValueKind::from_protocol("number", None), ValueKind::Number);
        assert_eq!(ValueKind::from_protocol("object", Some("null")), ValueKind::Null);
        assert_eq!(ValueKind::from_protocol("object", Some("array")), ValueKind::Array);
        assert_eq!(ValueKind::from_protocol("object", None), ValueKind::Object);
        assert_eq!(
            ValueKind::from_protocol("object", Some("webassemblymemory")),
            ValueKind::Object
        );
        assert_eq!(ValueKind::from_protocol("function", None), ValueKind::Function);
        assert!(ValueKind::Null.is_primitive());
        assert!(!ValueKind::Symbol.is_primitive());
    }

    #[test]
    fn test_primitive_is_copied() {
        let value = parse(json!({ "type": "number", "value": 2, "description": "2" }));

        assert_eq!(value.kind(), ValueKind::Number);
        assert!(!value.is_remote());
        assert_eq!(value.to_json(), json!(2));
    }

    #[test]
    fn test_unserializable_number() {
        let value = parse(json!({ "type": "number", "unserializableValue": "NaN" }));
        assert_eq!(value.to_json(), json!("NaN"));
    }

    #[test]
    fn test_object_keeps_handle() {
        let value = parse(json!({
            "type": "object",
            "className": "Object",
            "description": "Object",
            "objectId": "obj-1"
        }));

        assert_eq!(value.kind(), ValueKind::Object);
        assert_eq!(value.object_id().map(RemoteObjectId::as_str), Some("obj-1"));
        assert_eq!(value.description(), Some("Object"));
        assert_eq!(value.to_json(), json!("Object"));
    }

    #[test]
    fn test_exception_description_falls_back_to_text() {
        let details: ExceptionDetails =
            serde_json::from_value(json!({ "text": "Uncaught" })).expect("details");
        assert_eq!(details.description(), "Uncaught");

        let details: ExceptionDetails = serde_json::from_value(json!({
            "text": "Uncaught",
            "exception": { "type": "object", "subtype": "error", "description": "ReferenceError: x is not defined" }
        }))
        .expect("details");
        assert_eq!(details.description(), "ReferenceError: x is not defined");
    }
}
