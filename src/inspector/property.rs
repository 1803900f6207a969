//! Property descriptors and listing options.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::RemoteObjectId;
use crate::protocol::RuntimeCommand;

use super::Inspector;
use super::names::{NameMapper, SourceLocation};
use super::value::{ExceptionDetails, RemoteObject, ResolvedValue};

// ============================================================================
// ListOptions
// ============================================================================

/// Options for [`Inspector::list_properties`](super::Inspector::list_properties).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Only own properties, not the prototype chain.
    pub own_only: bool,

    /// Only accessor properties.
    pub accessors_only: bool,

    /// Append internal slots such as `[[PrimitiveValue]]`.
    pub include_internal: bool,

    /// Location passed to the name mapper.
    pub location: Option<SourceLocation>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            own_only: true,
            accessors_only: false,
            include_internal: false,
            location: None,
        }
    }
}

impl ListOptions {
    /// Creates default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes properties from the prototype chain.
    #[inline]
    #[must_use]
    pub fn with_inherited(mut self) -> Self {
        self.own_only = false;
        self
    }

    /// Restricts the listing to accessors.
    #[inline]
    #[must_use]
    pub fn accessors_only(mut self) -> Self {
        self.accessors_only = true;
        self
    }

    /// Appends internal properties after regular ones.
    #[inline]
    #[must_use]
    pub fn with_internal(mut self) -> Self {
        self.include_internal = true;
        self
    }

    /// Scopes name remapping to `location`.
    #[inline]
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

// ============================================================================
// PropertyDescriptor
// ============================================================================

/// One property of a remote object.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Display name, remapped when a mapper knows the original.
    pub name: String,
    /// Name as reported by the target.
    pub generated_name: String,
    /// Data value; `None` for accessors.
    pub value: Option<ResolvedValue>,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
    pub is_own: Option<bool>,
    pub getter: Option<ResolvedValue>,
    pub setter: Option<ResolvedValue>,
    /// Reading the property threw.
    pub was_thrown: bool,
    /// Internal slot rather than a regular property.
    pub internal: bool,
}

impl PropertyDescriptor {
    /// Returns `true` if the property is a getter/setter pair.
    #[inline]
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        self.value.is_none() && (self.getter.is_some() || self.setter.is_some())
    }

    fn from_wire(wire: WireProperty, internal: bool) -> Self {
        Self {
            name: wire.name.clone(),
            generated_name: wire.name,
            value: wire.value.map(ResolvedValue::from),
            writable: wire.writable,
            enumerable: wire.enumerable,
            configurable: wire.configurable,
            is_own: wire.is_own,
            getter: wire.get.filter(has_function).map(ResolvedValue::from),
            setter: wire.set.filter(has_function).map(ResolvedValue::from),
            was_thrown: wire.was_thrown.unwrap_or(false),
            internal,
        }
    }

    pub(crate) fn remap(&mut self, mapper: &dyn NameMapper, location: Option<&SourceLocation>) {
        if let Some(original) = mapper.lookup_original_name(&self.generated_name, location) {
            self.name = original;
        }
    }
}

/// Absent accessors are reported as `{"type": "undefined"}`.
fn has_function(remote: &RemoteObject) -> bool {
    remote.type_name != "undefined"
}

// ============================================================================
// Inspector - Properties
// ============================================================================

impl Inspector {
    /// Lists the properties of a remote object in the order the target
    /// reports them.
    ///
    /// An object without matching properties yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyAccess`] wrapping the underlying failure.
    pub async fn list_properties(
        &self,
        object_id: &RemoteObjectId,
        options: &ListOptions,
    ) -> Result<Vec<PropertyDescriptor>> {
        self.fetch_properties(object_id, options)
            .await
            .map_err(|e| Error::property_access(object_id.clone(), e))
    }

    async fn fetch_properties(
        &self,
        object_id: &RemoteObjectId,
        options: &ListOptions,
    ) -> Result<Vec<PropertyDescriptor>> {
        let listing: PropertyListing = self
            .send_command(RuntimeCommand::GetProperties {
                object_id: object_id.clone(),
                own_properties: options.own_only,
                accessor_properties_only: options.accessors_only,
                generate_preview: false,
            })
            .await?;

        if let Some(details) = &listing.exception_details {
            return Err(Error::evaluation(details.description()));
        }

        let mut descriptors = listing.into_descriptors(options.include_internal);

        if let Some(mapper) = &self.names {
            for descriptor in &mut descriptors {
                descriptor.remap(mapper.as_ref(), options.location.as_ref());
            }
        }

        debug!(%object_id, count = descriptors.len(), "Listed properties");
        Ok(descriptors)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProperty {
    name: String,
    #[serde(default)]
    value: Option<RemoteObject>,
    #[serde(default)]
    writable: Option<bool>,
    #[serde(default)]
    get: Option<RemoteObject>,
    #[serde(default)]
    set: Option<RemoteObject>,
    #[serde(default)]
    configurable: Option<bool>,
    #[serde(default)]
    enumerable: Option<bool>,
    #[serde(default)]
    was_thrown: Option<bool>,
    #[serde(default)]
    is_own: Option<bool>,
}

/// Result of `Runtime.getProperties`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyListing {
    #[serde(default)]
    result: Vec<WireProperty>,
    #[serde(default)]
    internal_properties: Vec<WireProperty>,
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

impl PropertyListing {
    /// Converts to descriptors in wire order, internal slots last.
    pub fn into_descriptors(self, include_internal: bool) -> Vec<PropertyDescriptor> {
        let internal = if include_internal {
            self.internal_properties
        } else {
            Vec::new()
        };

        self.result
            .into_iter()
            .map(|wire| PropertyDescriptor::from_wire(wire, false))
            .chain(
                internal
                    .into_iter()
                    .map(|wire| PropertyDescriptor::from_wire(wire, true)),
            )
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
