//! High-level client façade.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | Connection plus value resolver |
//! | [`ClientBuilder`] | Fluent configuration builder |
//!
//! # Example
//!
//! ```no_run
//! use devtools_inspector::{Client, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = Client::builder()
//!     .endpoint("ws://127.0.0.1:9229/7d6c1b2e")
//!     .max_depth(3)
//!     .connect()
//!     .await?;
//!
//! let value = client.evaluate_global("process.versions").await?;
//! let tree = client.inspect(&value).await?;
//! println!("{}", tree.to_json());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::Client;
