//! Portal configuration
//!
//! Loaded from TOML. Every section is optional; omitted values fall back to
//! the built-in defaults, and omitted route lists fall back to the standard
//! route table.

use crate::error::{PortalError, Result};
use crate::telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use taskhub_access::{PermissionEvaluator, SharedAuditSink};
use taskhub_routing::{
    LandingPages, RouteGuard, RoutePermissionTable, RouteTableConfig, DEFAULT_ENTRY_PAGE,
    DEFAULT_EXEMPT_PATHS,
};

/// Entity lookup cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupCacheConfig {
    /// Wrap the lookup service in a cache
    pub enabled: bool,
    /// Entries per entity kind
    pub max_capacity: u64,
    /// Time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for LookupCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 1_000,
            ttl_secs: 60,
        }
    }
}

impl LookupCacheConfig {
    /// Time-to-live as a duration
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Portal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Unauthenticated entry page
    pub entry_page: String,
    /// Paths allowed without a route rule
    pub exempt_paths: Vec<String>,
    /// Per-role landing pages
    pub landing_pages: LandingPages,
    /// Logging
    pub logging: LoggingConfig,
    /// Entity lookup cache
    pub lookup_cache: LookupCacheConfig,
    /// Route table overrides
    pub routes: RouteTableConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            entry_page: DEFAULT_ENTRY_PAGE.to_string(),
            exempt_paths: DEFAULT_EXEMPT_PATHS.iter().map(|p| (*p).to_string()).collect(),
            landing_pages: LandingPages::default(),
            logging: LoggingConfig::default(),
            lookup_cache: LookupCacheConfig::default(),
            routes: RouteTableConfig::default(),
        }
    }
}

impl PortalConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Io`] if the file cannot be read,
    /// [`PortalError::Parse`] if it is not valid TOML for this schema, and
    /// [`PortalError::Config`] if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text).map_err(|source| PortalError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "portal configuration loaded");
        Ok(config)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Parse`] or [`PortalError::Config`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| PortalError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Config`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        let pages = [
            ("entry_page", self.entry_page.as_str()),
            ("landing_pages.system_admin", self.landing_pages.system_admin.as_str()),
            ("landing_pages.agency_admin", self.landing_pages.agency_admin.as_str()),
            ("landing_pages.client_admin", self.landing_pages.client_admin.as_str()),
            ("landing_pages.client_user", self.landing_pages.client_user.as_str()),
        ];
        for (name, page) in pages {
            if !page.starts_with('/') {
                return Err(PortalError::config(format!(
                    "{name} must be an absolute path, got '{page}'"
                )));
            }
        }

        if let Some(path) = self.exempt_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(PortalError::config(format!(
                "exempt path must be absolute, got '{path}'"
            )));
        }

        if self.lookup_cache.enabled
            && (self.lookup_cache.max_capacity == 0 || self.lookup_cache.ttl_secs == 0)
        {
            return Err(PortalError::config(
                "lookup_cache.max_capacity and ttl_secs must be positive when enabled",
            ));
        }
        Ok(())
    }

    /// Build the route guard this configuration describes
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Route`] if a route declaration is invalid.
    pub fn route_guard(
        &self,
        evaluator: PermissionEvaluator,
        audit: SharedAuditSink,
    ) -> Result<RouteGuard> {
        let table = RoutePermissionTable::from_config(&self.routes)?;
        Ok(RouteGuard::new(table, evaluator, audit)
            .with_landing_pages(self.landing_pages.clone())
            .with_entry_page(self.entry_page.clone())
            .with_exempt_paths(&self.exempt_paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskhub_access::{Permission, Role};

    #[test]
    fn empty_document_is_default() {
        assert_eq!(PortalConfig::from_toml_str("").unwrap(), PortalConfig::default());
    }

    #[test]
    fn full_document() {
        let config = PortalConfig::from_toml_str(
            r#"
            entry_page = "/sign-in"
            exempt_paths = ["/", "/sign-in"]

            [landing_pages]
            client_user = "/tasks"

            [logging]
            level = "debug"
            json = true

            [lookup_cache]
            enabled = false

            [[routes.exact]]
            path = "/tasks"
            permission = "view_tasks"

            [[routes.dynamic]]
            pattern = "/agencies/:id"
            permission = "view_agency"
            entity = "agency"
            "#,
        )
        .unwrap();

        assert_eq!(config.entry_page, "/sign-in");
        assert_eq!(config.landing_pages.for_role(Role::ClientUser), "/tasks");
        assert_eq!(config.landing_pages.for_role(Role::AgencyAdmin), "/dashboard");
        assert!(config.logging.json);
        assert!(!config.lookup_cache.enabled);
        assert_eq!(config.lookup_cache.ttl_secs, 60);
        assert_eq!(config.routes.exact[0].permission, Permission::ViewTasks);
    }

    #[test]
    fn unknown_permission_is_parse_error() {
        let err = PortalConfig::from_toml_str(
            r#"
            [[routes.exact]]
            path = "/x"
            permission = "fly"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PortalError::Parse { .. }), "{err}");
    }

    #[test]
    fn relative_pages_rejected() {
        let err = PortalConfig::from_toml_str(r#"entry_page = "login""#).unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));

        let err = PortalConfig::from_toml_str(
            r#"
            [lookup_cache]
            ttl_secs = 0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("lookup_cache"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.toml");
        std::fs::write(&path, "entry_page = \"/auth\"\n").unwrap();

        let config = PortalConfig::load(&path).unwrap();
        assert_eq!(config.entry_page, "/auth");

        let missing = PortalConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, PortalError::Io(_)));
    }

    #[test]
    fn guard_uses_configured_entry_page() {
        let config = PortalConfig::from_toml_str(r#"entry_page = "/auth""#).unwrap();
        let guard = config
            .route_guard(
                PermissionEvaluator::default(),
                std::sync::Arc::new(taskhub_access::NullAuditSink),
            )
            .unwrap();
        assert_eq!(guard.entry_page(), "/auth");
        assert!(guard.is_exempt("/profile"));
    }
}
