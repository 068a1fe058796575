//! Error types for TaskHub Core
//!
//! Covers:
//! - Configuration loading and validation
//! - Route table construction
//! - Logging setup
//! - Operations that need a signed-in user

use std::path::PathBuf;
use taskhub_routing::RouteError;

/// Main portal error type
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Configuration invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// Route table rejected
    #[error("route table error: {0}")]
    Route(#[from] RouteError),

    /// File system error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Telemetry(String),

    /// Operation needs a signed-in user
    #[error("not signed in")]
    NotSignedIn,
}

impl PortalError {
    /// Create configuration error
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error comes from configuration rather than runtime state
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Parse { .. } | Self::Route(_))
    }
}

/// Result alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;
