//! Navigation side effects
//!
//! The portal decides; the shell behind [`Router`] performs the navigation.

/// Shell navigation surface
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait Router: Send + Sync {
    /// Replace the current location
    fn redirect(&self, to: &str);

    /// Drop the shell's session state (tokens, caches)
    fn logout(&self);
}

/// Router that only logs, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRouter;

impl Router for LoggingRouter {
    fn redirect(&self, to: &str) {
        tracing::info!(to, "redirect");
    }

    fn logout(&self) {
        tracing::info!("logout");
    }
}
