//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging section of the portal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `taskhub_navigation=debug`
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Filter built from `RUST_LOG`, falling back to the configured level
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Telemetry`] if the configured level does not
    /// parse as a filter directive.
    pub fn filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| PortalError::Telemetry(format!("bad level '{}': {e}", self.level))),
        }
    }
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns [`PortalError::Telemetry`] on a bad level or when a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    installed.map_err(|e| PortalError::Telemetry(e.to_string()))?;
    tracing::debug!(level = %config.level, json = config.json, "tracing initialized");
    Ok(())
}
