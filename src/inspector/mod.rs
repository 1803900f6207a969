//! Remote value resolver.
//!
//! Evaluates expressions, lists object properties, and expands remote
//! object graphs into local structures. Every request goes through the
//! [`Transport`](crate::transport::Transport) seam; the resolver never
//! touches the socket or the pending table.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Inspector struct and collaborators |
//! | `evaluate` | Frame and global evaluation |
//! | `property` | Property listing and descriptors |
//! | `inspect` | Bounded recursive expansion |
//! | `value` | Value kinds and resolved values |
//! | `names` | Name mapping and frame source collaborators |
//!
//! # Example
//!
//! ```ignore
//! let inspector = Inspector::new(Arc::new(connection))
//!     .with_name_mapper(Arc::new(names));
//!
//! let user = inspector.evaluate("user", Some(&frame_id)).await?;
//! let tree = inspector.inspect(&user, 2).await?;
//! println!("{}", tree.to_json());
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod evaluate;
mod inspect;
mod names;
mod property;
mod value;

#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Inspector;
pub use inspect::{DEFAULT_MAX_DEPTH, InspectedProperty, InspectedValue};
pub use names::{FrameSource, NameMapper, NameTable, SourceLocation};
pub use property::{ListOptions, PropertyDescriptor};
pub use value::{RemoteObject, ResolvedValue, ValueKind};
