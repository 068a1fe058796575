//! Dynamic route patterns
//!
//! Patterns use `:name` segments (`/clients/:id`) and compile to anchored
//! regular expressions with one named capture per parameter.

use crate::error::RouteError;
use regex::Regex;
use std::fmt;

/// Compiled `:param` route pattern
#[derive(Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    params: Vec<String>,
}

impl RoutePattern {
    /// Compile a pattern
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if the pattern is relative, has
    /// an empty or repeated parameter name, or fails to compile.
    pub fn compile(pattern: &str) -> Result<Self, RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::invalid_pattern(pattern, "must start with '/'"));
        }

        let mut expr = String::from("^");
        let mut params = Vec::new();

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            expr.push('/');
            if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(RouteError::invalid_pattern(pattern, "bad parameter name"));
                }
                if params.iter().any(|p| p == name) {
                    return Err(RouteError::invalid_pattern(
                        pattern,
                        format!("parameter '{name}' repeated"),
                    ));
                }
                expr.push_str(&format!("(?P<{name}>[^/]+)"));
                params.push(name.to_string());
            } else {
                expr.push_str(&regex::escape(segment));
            }
        }

        if params.is_empty() && expr == "^" {
            expr.push('/');
        }
        expr.push('$');

        let regex =
            Regex::new(&expr).map_err(|e| RouteError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            params,
        })
    }

    /// Pattern text as declared
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parameter names in order
    #[inline]
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Match a normalized path, returning captured parameters
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(path)?;
        let values = self
            .params
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();
        Some(RouteParams { values })
    }

    /// Whether the pattern matches a normalized path
    #[inline]
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoutePattern").field(&self.source).finish()
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RoutePattern {}

/// Parameters captured from a dynamic route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: Vec<(String, String)>,
}

impl RouteParams {
    /// Value of a named parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Entity id: the `id` parameter, else the first parameter
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        self.get("id")
            .or_else(|| self.values.first().map(|(_, v)| v.as_str()))
    }

    /// Whether nothing was captured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
