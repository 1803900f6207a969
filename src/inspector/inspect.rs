//! Bounded recursive expansion of remote object graphs.
//!
//! The depth bound is the only guard against cyclic graphs: a
//! self-referencing object is expanded until the bound is reached and
//! then truncated.

// ============================================================================
// Imports
// ============================================================================

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, try_join_all};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

use super::Inspector;
use super::property::{ListOptions, PropertyDescriptor};
use super::value::ResolvedValue;

// ============================================================================
// Constants
// ============================================================================

/// Default number of property levels expanded by `inspect`.
pub const DEFAULT_MAX_DEPTH: usize = 2;

// ============================================================================
// Types
// ============================================================================

/// Result of inspecting a value.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectedValue {
    /// Primitive copied from the target.
    Value(ResolvedValue),

    /// Remote object with its properties expanded.
    Object {
        value: ResolvedValue,
        properties: Vec<InspectedProperty>,
    },

    /// Remote object left unexpanded at the depth bound.
    Truncated(ResolvedValue),

    /// Accessor property; getters are never invoked.
    Accessor { getter: bool, setter: bool },
}

/// One named entry of an expanded object.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectedProperty {
    pub name: String,
    pub generated_name: String,
    pub value: InspectedValue,
}

impl InspectedValue {
    /// Returns `true` for a truncation marker.
    #[inline]
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated(_))
    }

    /// Returns the expanded properties, empty unless this is an object.
    #[must_use]
    pub fn properties(&self) -> &[InspectedProperty] {
        match self {
            Self::Object { properties, .. } => properties,
            _ => &[],
        }
    }

    /// Returns the first property named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&InspectedValue> {
        self.properties()
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Renders the nested mapping as JSON, keeping property order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Value(value) => value.to_json(),

            Self::Object { properties, .. } => {
                let mut map = Map::with_capacity(properties.len());
                for property in properties {
                    map.insert(property.name.clone(), property.value.to_json());
                }
                Value::Object(map)
            }

            Self::Truncated(value) => {
                let label = value
                    .description()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.kind().to_string());
                Value::String(format!("[{label}]"))
            }

            Self::Accessor { getter, setter } => Value::String(
                match (getter, setter) {
                    (true, true) => "[Getter/Setter]",
                    (true, false) => "[Getter]",
                    _ => "[Setter]",
                }
                .to_string(),
            ),
        }
    }
}

// ============================================================================
// Inspector - Inspection
// ============================================================================

impl Inspector {
    /// Expands `value` into a nested structure, `max_depth` property
    /// levels deep.
    ///
    /// Primitives pass through. With `max_depth == 0` a remote value
    /// yields a single truncation marker. Sibling properties are fetched
    /// concurrently; the result keeps the order the target reports.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::PropertyAccess`](crate::Error::PropertyAccess)
    /// raised while listing any level. No partial result is returned.
    pub async fn inspect(&self, value: &ResolvedValue, max_depth: usize) -> Result<InspectedValue> {
        self.inspect_with(value, max_depth, &ListOptions::default())
            .await
    }

    /// Like [`Inspector::inspect`] with explicit listing options.
    pub async fn inspect_with(
        &self,
        value: &ResolvedValue,
        max_depth: usize,
        options: &ListOptions,
    ) -> Result<InspectedValue> {
        debug!(kind = %value.kind(), max_depth, "Inspecting value");
        self.expand(value.clone(), max_depth, options).await
    }

    fn expand<'a>(
        &'a self,
        value: ResolvedValue,
        depth: usize,
        options: &'a ListOptions,
    ) -> BoxFuture<'a, Result<InspectedValue>> {
        async move {
            let Some(object_id) = value.object_id().cloned() else {
                return Ok(InspectedValue::Value(value));
            };

            if depth == 0 {
                return Ok(InspectedValue::Truncated(value));
            }

            let descriptors = self.list_properties(&object_id, options).await?;
            let children: Vec<_> = descriptors
                .into_iter()
                .map(|descriptor| self.expand_property(descriptor, depth - 1, options))
                .collect();
            let properties = try_join_all(children).await?;

            Ok(InspectedValue::Object { value, properties })
        }
        .boxed()
    }

    async fn expand_property(
        &self,
        descriptor: PropertyDescriptor,
        depth: usize,
        options: &ListOptions,
    ) -> Result<InspectedProperty> {
        let accessor = descriptor.is_accessor();

        let value = match descriptor.value {
            Some(value) => self.expand(value, depth, options).await?,
            None if accessor => InspectedValue::Accessor {
                getter: descriptor.getter.is_some(),
                setter: descriptor.setter.is_some(),
            },
            None => InspectedValue::Value(ResolvedValue::undefined()),
        };

        Ok(InspectedProperty {
            name: descriptor.name,
            generated_name: descriptor.generated_name,
            value,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use crate::error::Error;
    use crate::identifiers::RemoteObjectId;
    use crate::inspector::NameTable;
    use crate::inspector::mock::ScriptedTransport;

    fn object(id: &str, description: &str) -> Value {
        json!({ "type": "object", "className": "Object", "description": description, "objectId": id })
    }

    fn remote(id: &str) -> ResolvedValue {
        ResolvedValue::Remote {
            kind: crate::inspector::ValueKind::Object,
            object_id: RemoteObjectId::new(id),
            class_name: Some("Object".to_string()),
            description: Some("Object".to_string()),
        }
    }

    /// root -> { a: 1, child -> { grand -> { x: true }, n: 2 }, s: "hi" }
    fn nested_graph() -> ScriptedTransport {
        ScriptedTransport::new(|_, params| {
            let params = params.expect("params");
            let listing = match params["objectId"].as_str() {
                Some("root") => json!([
                    { "name": "a", "value": { "type": "number", "value": 1 } },
                    { "name": "child", "value": object("child", "Child") },
                    { "name": "s", "value": { "type": "string", "value": "hi" } }
                ]),
                Some("child") => json!([
                    { "name": "grand", "value": object("grand", "Grand") },
                    { "name": "n", "value": { "type": "number", "value": 2 } }
                ]),
                Some("grand") => json!([
                    { "name": "x", "value": { "type": "boolean", "value": true } }
                ]),
                other => panic!("unexpected object {other:?}"),
            };
            Ok(json!({ "result": listing }))
        })
    }

    #[tokio::test]
    async fn test_primitive_passes_through() {
        let transport = Arc::new(nested_graph());
        let inspector = Inspector::new(transport.clone());

        let value = ResolvedValue::Primitive {
            kind: crate::inspector::ValueKind::Number,
            value: json!(7),
            unserializable: None,
            description: None,
        };
        let inspected = inspector.inspect(&value, 2).await.expect("inspect");

        assert_eq!(inspected, InspectedValue::Value(value));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_depth_zero_is_single_marker() {
        let transport = Arc::new(nested_graph());
        let inspector = Inspector::new(transport.clone());

        let inspected = inspector.inspect(&remote("root"), 0).await.expect("inspect");

        assert!(inspected.is_truncated());
        assert!(transport.calls().is_empty());
        assert_eq!(inspected.to_json(), json!("[Object]"));
    }

    #[tokio::test]
    async fn test_depth_two_expands_two_levels() {
        let transport = Arc::new(nested_graph());
        let inspector = Inspector::new(transport.clone());

        let inspected = inspector
            .inspect(&remote("root"), DEFAULT_MAX_DEPTH)
            .await
            .expect("inspect");

        let child = inspected.get("child").expect("child");
        assert_eq!(child.properties().len(), 2);
        assert!(child.get("grand").expect("grand").is_truncated());
        assert_eq!(transport.calls().len(), 2);

        assert_eq!(
            inspected.to_json(),
            json!({
                "a": 1,
                "child": { "grand": "[Grand]", "n": 2 },
                "s": "hi"
            })
        );
    }

    #[tokio::test]
    async fn test_depth_one_truncates_children() {
        let transport = Arc::new(nested_graph());
        let inspector = Inspector::new(transport);

        let inspected = inspector.inspect(&remote("root"), 1).await.expect("inspect");
        assert!(inspected.get("child").expect("child").is_truncated());
        assert_eq!(inspected.get("a"), Some(&InspectedValue::Value(ResolvedValue::Primitive {
            kind: crate::inspector::ValueKind::Number,
            value: json!(1),
            unserializable: None,
            description: None,
        })));
    }

    #[tokio::test]
    async fn test_sibling_order_survives_out_of_order_completion() {
        let transport = ScriptedTransport::new(|_, params| {
            let params = params.expect("params");
            let listing = match params["objectId"].as_str() {
                Some("root") => json!([
                    { "name": "first", "value": object("slow", "Slow") },
                    { "name": "second", "value": object("medium", "Medium") },
                    { "name": "third", "value": object("fast", "Fast") }
                ]),
                Some(id) => json!([{ "name": "id", "value": { "type": "string", "value": id } }]),
                None => panic!("missing objectId"),
            };
            Ok(json!({ "result": listing }))
        })
        .with_delay("slow", Duration::from_millis(60))
        .with_delay("medium", Duration::from_millis(30));
        let inspector = Inspector::new(Arc::new(transport));

        let inspected = inspector.inspect(&remote("root"), 2).await.expect("inspect");

        let names: Vec<_> = inspected.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(
            inspected.get("first").and_then(|v| v.get("id")).map(InspectedValue::to_json),
            Some(json!("slow"))
        );
    }

    #[tokio::test]
    async fn test_cycle_is_bounded_by_depth() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| {
            Ok(json!({ "result": [{ "name": "self", "value": object("loop", "Loop") }] }))
        }));
        let inspector = Inspector::new(transport.clone());

        let inspected = inspector.inspect(&remote("loop"), 3).await.expect("inspect");

        assert_eq!(transport.calls().len(), 3);
        assert_eq!(
            inspected.to_json(),
            json!({ "self": { "self": { "self": "[Loop]" } } })
        );
    }

    #[tokio::test]
    async fn test_nested_failure_fails_whole_inspection() {
        let transport = Arc::new(ScriptedTransport::new(|_, params| {
            let params = params.expect("params");
            match params["objectId"].as_str() {
                Some("root") => Ok(json!({ "result": [
                    { "name": "ok", "value": { "type": "number", "value": 1 } },
                    { "name": "gone", "value": object("gone", "Gone") }
                ] })),
                _ => Err(Error::protocol(-32000, "Could not find object with given id", None)),
            }
        }));
        let inspector = Inspector::new(transport);

        let err = inspector.inspect(&remote("root"), 2).await.expect_err("fails");
        match err {
            Error::PropertyAccess { object_id, .. } => assert_eq!(object_id.as_str(), "gone"),
            other => panic!("expected property access error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nested_failure_leaves_no_pending_requests() {
        use crate::transport::mock::MockTarget;
        use crate::transport::{ConnectOptions, Connection};

        let mut target = MockTarget::start().await;
        let options = ConnectOptions::new().with_request_timeout(Duration::from_millis(200));
        let connection = Connection::connect_with(target.url(), options)
            .await
            .expect("connect");
        let inspector = Inspector::new(Arc::new(connection.clone()));

        let call = tokio::spawn(async move { inspector.inspect(&remote("root"), 2).await });

        let request = target.next_request().await;
        assert_eq!(request["params"]["objectId"], "root");
        target.reply(
            request["id"].as_u64().expect("id"),
            json!({ "result": [
                { "name": "gone", "value": object("gone", "Gone") },
                { "name": "silent", "value": object("silent", "Silent") }
            ] }),
        );

        // Fail one child listing, never answer the other.
        for _ in 0..2 {
            let request = target.next_request().await;
            if request["params"]["objectId"] == "gone" {
                target.reply_error(
                    request["id"].as_u64().expect("id"),
                    -32000,
                    "Could not find object with given id",
                );
            }
        }

        let err = call.await.expect("join").expect_err("fails");
        assert!(matches!(err, Error::PropertyAccess { .. }));
        assert_eq!(connection.pending_count(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(connection.pending_count(), 0);
        assert!(connection.is_connected());
    }

    #[tokio::test]
    async fn test_accessors_and_remapped_names() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| {
            Ok(json!({ "result": [
                { "name": "t", "value": { "type": "number", "value": 5 } },
                { "name": "size", "get": { "type": "function", "objectId": "fn-1" }, "set": { "type": "undefined" } }
            ] }))
        }));
        let inspector = Inspector::new(transport)
            .with_name_mapper(Arc::new(NameTable::new().with("t", "total")));

        let inspected = inspector.inspect(&remote("obj"), 1).await.expect("inspect");

        assert_eq!(inspected.properties()[0].name, "total");
        assert_eq!(inspected.properties()[0].generated_name, "t");
        assert_eq!(
            inspected.to_json(),
            json!({ "total": 5, "size": "[Getter]" })
        );
    }
}
