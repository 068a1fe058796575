//! Error types for access evaluation
//!
//! Parsing roles, permissions and entity kinds from their wire names is the
//! only fallible step. Evaluation itself never fails: every error here is
//! turned into a denial by the [`crate::PermissionEvaluator`].

/// Errors raised while decoding access-control values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Role name is not one of the four known roles
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// Permission name is not part of the closed permission set
    #[error("unknown permission: '{0}'")]
    UnknownPermission(String),

    /// Entity kind is not system, agency or client
    #[error("unknown entity kind: '{0}'")]
    UnknownEntityKind(String),
}

/// Errors raised by an audit sink
///
/// These never reach the caller of an evaluation; [`crate::audit::emit`]
/// swallows them after logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// Sink buffer is full and the record was dropped
    #[error("audit sink is full")]
    Full,

    /// Sink has been closed
    #[error("audit sink is closed")]
    Closed,

    /// Sink-specific failure
    #[error("audit sink failed: {0}")]
    Sink(String),
}
