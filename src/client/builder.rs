//! Builder pattern for client configuration.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use devtools_inspector::Client;
//!
//! # async fn example() -> devtools_inspector::Result<()> {
//! let client = Client::builder()
//!     .endpoint("ws://127.0.0.1:9229/7d6c1b2e")
//!     .request_timeout(Duration::from_secs(5))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::inspector::{DEFAULT_MAX_DEPTH, FrameSource, Inspector, NameMapper};
use crate::transport::{ConnectOptions, Connection};

use super::core::Client;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`].
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Clone)]
pub struct ClientBuilder {
    /// Target WebSocket endpoint.
    endpoint: Option<String>,
    /// Connection tuning.
    options: ConnectOptions,
    /// Default depth for `inspect`.
    max_depth: usize,
    /// Name remapping collaborator.
    names: Option<Arc<dyn NameMapper>>,
    /// Current frame collaborator.
    frames: Option<Arc<dyn FrameSource>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            options: ConnectOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            names: None,
            frames: None,
        }
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .field("max_depth", &self.max_depth)
            .field("name_mapper", &self.names.is_some())
            .field("frame_source", &self.frames.is_some())
            .finish()
    }
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target endpoint, e.g. `ws://127.0.0.1:9229/<id>`.
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the default per-request timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = timeout;
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Sets the outstanding request limit.
    #[inline]
    #[must_use]
    pub fn max_pending(mut self, max_pending: usize) -> Self {
        self.options.max_pending = max_pending;
        self
    }

    /// Replaces all connection options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the default depth used by [`Client::inspect`].
    #[inline]
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Attaches a name mapper.
    #[must_use]
    pub fn name_mapper(mut self, mapper: impl NameMapper + 'static) -> Self {
        self.names = Some(Arc::new(mapper));
        self
    }

    /// Attaches a source of the current call frame.
    #[must_use]
    pub fn frame_source(mut self, frames: impl FrameSource + 'static) -> Self {
        self.frames = Some(Arc::new(frames));
        self
    }

    /// Connects and returns the client.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no endpoint is set or options are invalid
    /// - [`Error::Connection`] / [`Error::ConnectionTimeout`] from the handshake
    pub async fn connect(self) -> Result<Client> {
        let endpoint = self.validate_endpoint()?;
        self.options.validate()?;

        let connection = Connection::connect_with(&endpoint, self.options.clone()).await?;

        let mut inspector = Inspector::new(Arc::new(connection.clone()));
        if let Some(names) = self.names {
            inspector = inspector.with_name_mapper(names);
        }
        if let Some(frames) = self.frames {
            inspector = inspector.with_frame_source(frames);
        }

        Ok(Client::new(connection, inspector, self.max_depth))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientBuilder {
    fn validate_endpoint(&self) -> Result<String> {
        self.endpoint.clone().ok_or_else(|| {
            Error::config(
                "Endpoint is required. Use .endpoint() to set it.\n\
                 Example: Client::builder().endpoint(\"ws://127.0.0.1:9229/<id>\")",
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
