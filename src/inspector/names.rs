//! Collaborators consulted by the inspector.
//!
//! - [`NameMapper`] remaps generated identifiers to original-source names.
//! - [`FrameSource`] supplies the current call frame for frame-less
//!   evaluation. Pause state is owned by whoever implements it.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::identifiers::{CallFrameId, ScriptId};
use crate::protocol::Location;

// ============================================================================
// SourceLocation
// ============================================================================

/// Position in a generated script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub script_id: ScriptId,
    pub line_number: u32,
    pub column_number: u32,
}

impl SourceLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(script_id: impl Into<ScriptId>, line_number: u32, column_number: u32) -> Self {
        Self {
            script_id: script_id.into(),
            line_number,
            column_number,
        }
    }
}

impl From<&Location> for SourceLocation {
    fn from(location: &Location) -> Self {
        Self {
            script_id: location.script_id.clone(),
            line_number: location.line_number,
            column_number: location.column_number.unwrap_or(0),
        }
    }
}

// ============================================================================
// NameMapper
// ============================================================================

/// Maps generated names back to original-source names.
///
/// Returning `None` leaves the generated name in place.
pub trait NameMapper: Send + Sync {
    /// Looks up the original name of `generated`, optionally scoped to
    /// `location`.
    fn lookup_original_name(
        &self,
        generated: &str,
        location: Option<&SourceLocation>,
    ) -> Option<String>;
}

/// In-memory [`NameMapper`].
///
/// Script-scoped entries take precedence over global ones.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    global: FxHashMap<String, String>,
    scoped: FxHashMap<ScriptId, FxHashMap<String, String>>,
}

impl NameTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `generated` to `original` in every script.
    pub fn insert(&mut self, generated: impl Into<String>, original: impl Into<String>) {
        self.global.insert(generated.into(), original.into());
    }

    /// Maps `generated` to `original` within `script_id` only.
    pub fn insert_scoped(
        &mut self,
        script_id: impl Into<ScriptId>,
        generated: impl Into<String>,
        original: impl Into<String>,
    ) {
        self.scoped
            .entry(script_id.into())
            .or_default()
            .insert(generated.into(), original.into());
    }

    /// Builder form of [`NameTable::insert`].
    #[must_use]
    pub fn with(mut self, generated: impl Into<String>, original: impl Into<String>) -> Self {
        self.insert(generated, original);
        self
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.global.len() + self.scoped.values().map(FxHashMap::len).sum::<usize>()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NameMapper for NameTable {
    fn lookup_original_name(
        &self,
        generated: &str,
        location: Option<&SourceLocation>,
    ) -> Option<String> {
        location
            .and_then(|loc| self.scoped.get(&loc.script_id))
            .and_then(|names| names.get(generated))
            .or_else(|| self.global.get(generated))
            .cloned()
    }
}

// ============================================================================
// FrameSource
// ============================================================================

/// Supplies the call frame used when evaluation is given none.
pub trait FrameSource: Send + Sync {
    /// Returns the frame of the current pause, if paused.
    fn current_frame(&self) -> Option<CallFrameId>;
}

impl<F> FrameSource for F
where
    F: Fn() -> Option<CallFrameId> + Send + Sync,
{
    fn current_frame(&self) -> Option<CallFrameId> {
        self()
    }
}

// ============================================================================
// Tests
// ============================================================================
