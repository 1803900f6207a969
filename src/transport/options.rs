//! Connection options.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use devtools_inspector::transport::ConnectOptions;
//!
//! let options = ConnectOptions::new()
//!     .with_request_timeout(Duration::from_secs(5))
//!     .with_max_pending(256);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for the WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default limit on outstanding requests.
pub const DEFAULT_MAX_PENDING: usize = 1024;

// ============================================================================
// ConnectOptions
// ============================================================================

/// Tuning for a single connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Timeout applied by `send` when none is given.
    pub request_timeout: Duration,

    /// Maximum time to wait for the handshake.
    pub connect_timeout: Duration,

    /// Maximum number of outstanding requests.
    pub max_pending: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ConnectOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ConnectOptions {
    /// Sets the default request timeout.
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the outstanding request limit.
    #[inline]
    #[must_use]
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ConnectOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a timeout is zero or the pending
    /// limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(Error::config("request timeout must be greater than zero"));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::config("connect timeout must be greater than zero"));
        }
        if self.max_pending == 0 {
            return Err(Error::config("max pending requests must be greater than zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConnectOptions::default();
        assert_eq!(options.request_timeout.as_secs(), 30);
        assert_eq!(options.connect_timeout.as_secs(), 30);
        assert_eq!(options.max_pending, 1024);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let options = ConnectOptions::new()
            .with_request_timeout(Duration::from_millis(50))
            .with_connect_timeout(Duration::from_secs(2))
            .with_max_pending(8);

        assert_eq!(options.request_timeout, Duration::from_millis(50));
        assert_eq!(options.connect_timeout, Duration::from_secs(2));
        assert_eq!(options.max_pending, 8);
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(
            ConnectOptions::new()
                .with_request_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(ConnectOptions::new().with_max_pending(0).validate().is_err());
    }
}
