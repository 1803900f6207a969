//! Core Inspector struct and accessors.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::transport::Transport;

use super::names::{FrameSource, NameMapper};

// ============================================================================
// Inspector
// ============================================================================

/// Remote value resolver.
///
/// Talks to the target only through the [`Transport`] it was built with;
/// cheap to clone.
#[derive(Clone)]
pub struct Inspector {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) names: Option<Arc<dyn NameMapper>>,
    pub(crate) frames: Option<Arc<dyn FrameSource>>,
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("name_mapper", &self.names.is_some())
            .field("frame_source", &self.frames.is_some())
            .finish_non_exhaustive()
    }
}

impl Inspector {
    /// Creates an inspector over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            names: None,
            frames: None,
        }
    }

    /// Attaches a name mapper.
    #[must_use]
    pub fn with_name_mapper(mut self, mapper: Arc<dyn NameMapper>) -> Self {
        self.names = Some(mapper);
        self
    }

    /// Attaches a source of the current call frame.
    #[must_use]
    pub fn with_frame_source(mut self, frames: Arc<dyn FrameSource>) -> Self {
        self.frames = Some(frames);
        self
    }
}

// ============================================================================
// Inspector - Internal
// ============================================================================

impl Inspector {
    /// Sends a command and decodes its result.
    pub(crate) async fn send_command<T>(&self, command: impl Into<Command>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let (method, params) = command.into().into_parts()?;
        trace!(%method, "Inspector request");

        let result = self.transport.send(&method, params).await?;
        serde_json::from_value(result)
            .map_err(|e| Error::invalid_response(format!("{method}: {e}")))
    }
}
