//! Error types for navigation
//!
//! Both kinds are recoverable: a failed lookup leaves the navigation context
//! at its previous value and the page keeps rendering.

use taskhub_access::EntityKind;

/// Errors raised by an [`crate::EntityLookup`] implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No entity with this id
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind
        kind: EntityKind,
        /// Requested id
        id: String,
    },

    /// Backend could not be reached
    #[error("lookup service unavailable: {0}")]
    Unavailable(String),

    /// Backend returned data that could not be decoded
    #[error("malformed lookup response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Create not-found error
    #[inline]
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether retrying may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Failure to resolve the entity named by a route
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to resolve {kind} '{id}': {source}")]
pub struct ResolveError {
    /// Entity kind being resolved
    pub kind: EntityKind,
    /// Entity id from the route
    pub id: String,
    /// Underlying lookup failure
    #[source]
    pub source: LookupError,
}

impl ResolveError {
    /// Create resolve error
    #[inline]
    #[must_use]
    pub fn new(kind: EntityKind, id: impl Into<String>, source: LookupError) -> Self {
        Self {
            kind,
            id: id.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_display() {
        let err = LookupError::not_found(EntityKind::Client, "C9");
        assert_eq!(err.to_string(), "client 'C9' not found");
    }

    #[test]
    fn resolve_error_wraps_source() {
        let err = ResolveError::new(
            EntityKind::Agency,
            "A1",
            LookupError::Unavailable("timeout".into()),
        );
        assert!(err.to_string().contains("agency 'A1'"));
        assert!(err.source.is_retryable());
    }
}
