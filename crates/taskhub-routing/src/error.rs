//! Error types for route table construction
//!
//! Route checks never fail at request time; these errors surface only while
//! building a table from configuration.

/// Errors building a route permission table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Pattern could not be compiled
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Exact path declared twice
    #[error("duplicate route: {0}")]
    DuplicateRoute(String),

    /// Exact path does not start with `/`
    #[error("route path must start with '/': {0}")]
    RelativePath(String),
}

impl RouteError {
    /// Create invalid pattern error
    #[inline]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_error_display() {
        let err = RouteError::invalid_pattern("/a/:", "empty parameter name");
        assert_eq!(
            err.to_string(),
            "invalid route pattern '/a/:': empty parameter name"
        );
        assert_eq!(
            RouteError::DuplicateRoute("/tasks".into()).to_string(),
            "duplicate route: /tasks"
        );
    }
}
