//! Route permission table
//!
//! Maps normalized paths to the permission they require. Exact paths are
//! checked first, then dynamic patterns in declaration order; the first
//! matching pattern wins.

use crate::error::RouteError;
use crate::pattern::RoutePattern;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taskhub_access::{EntityKind, Permission};

/// Exact route declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactRouteConfig {
    /// Normalized path
    pub path: String,
    /// Required permission
    pub permission: Permission,
}

/// Dynamic route declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRouteConfig {
    /// Pattern with `:param` segments
    pub pattern: String,
    /// Required permission
    pub permission: Permission,
    /// Entity type the captured id refers to
    #[serde(default)]
    pub entity: Option<EntityKind>,
}

/// Route section of the portal configuration
///
/// Either list left empty falls back to the standard routes of that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTableConfig {
    /// Exact routes
    pub exact: Vec<ExactRouteConfig>,
    /// Dynamic routes
    pub dynamic: Vec<DynamicRouteConfig>,
}

/// Compiled dynamic route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicRoute {
    /// Compiled pattern
    pub pattern: RoutePattern,
    /// Required permission
    pub permission: Permission,
    /// Entity type of the captured id
    pub entity: Option<EntityKind>,
}

/// Result of matching a path against the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Exact path or pattern that matched
    pub rule: String,
    /// Required permission
    pub permission: Permission,
    /// Entity type for scoped evaluation
    pub entity_type: Option<EntityKind>,
    /// Captured entity id
    pub entity_id: Option<String>,
}

/// Path → permission table
#[derive(Debug, Clone, Default)]
pub struct RoutePermissionTable {
    exact: IndexMap<String, Permission>,
    dynamic: Vec<DynamicRoute>,
}

const STANDARD_EXACT: &[(&str, Permission)] = &[
    ("/dashboard", Permission::ViewTasks),
    ("/systems", Permission::ViewSystem),
    ("/agencies", Permission::ViewAgency),
    ("/clients", Permission::ViewClient),
    ("/tasks", Permission::ViewTasks),
    ("/notifications", Permission::ViewTasks),
    ("/users", Permission::ViewUsers),
    ("/sops", Permission::ViewSops),
    ("/reports", Permission::ViewReports),
    ("/settings", Permission::ManageSettings),
];

const STANDARD_DYNAMIC: &[(&str, Permission, Option<EntityKind>)] = &[
    ("/systems/:id", Permission::ViewSystem, Some(EntityKind::System)),
    ("/agencies/:id", Permission::ViewAgency, Some(EntityKind::Agency)),
    ("/clients/:id", Permission::ViewClient, Some(EntityKind::Client)),
    ("/tasks/:id", Permission::ViewTasks, None),
    ("/sops/:id", Permission::ViewSops, None),
    ("/users/:id", Permission::ViewUsers, None),
];

impl RoutePermissionTable {
    /// Empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in portal routes
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        for (path, permission) in STANDARD_EXACT {
            table.exact.insert((*path).to_string(), *permission);
        }
        table.dynamic = standard_dynamic();
        table
    }

    /// Build from configuration
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] on a relative or duplicated exact path, or on a
    /// pattern that fails to compile.
    pub fn from_config(config: &RouteTableConfig) -> Result<Self, RouteError> {
        let mut table = Self::new();

        if config.exact.is_empty() {
            table.exact = Self::standard().exact;
        }
        for route in &config.exact {
            table.add_exact(&route.path, route.permission)?;
        }

        if config.dynamic.is_empty() {
            table.dynamic = standard_dynamic();
        }
        for route in &config.dynamic {
            table.add_dynamic(&route.pattern, route.permission, route.entity)?;
        }

        tracing::debug!(
            exact = table.exact.len(),
            dynamic = table.dynamic.len(),
            "route table built"
        );
        Ok(table)
    }

    /// Declare an exact route
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RelativePath`] or [`RouteError::DuplicateRoute`].
    pub fn add_exact(&mut self, path: &str, permission: Permission) -> Result<(), RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::RelativePath(path.to_string()));
        }
        let path = taskhub_navigation::normalize_path(path).into_owned();
        if self.exact.contains_key(&path) {
            return Err(RouteError::DuplicateRoute(path));
        }
        self.exact.insert(path, permission);
        Ok(())
    }

    /// Declare a dynamic route, matched after those already declared
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] or, for a pattern declared
    /// twice, [`RouteError::DuplicateRoute`].
    pub fn add_dynamic(
        &mut self,
        pattern: &str,
        permission: Permission,
        entity: Option<EntityKind>,
    ) -> Result<(), RouteError> {
        let pattern = RoutePattern::compile(pattern)?;
        if self.dynamic.iter().any(|r| r.pattern == pattern) {
            return Err(RouteError::DuplicateRoute(pattern.as_str().to_string()));
        }
        self.dynamic.push(DynamicRoute {
            pattern,
            permission,
            entity,
        });
        Ok(())
    }

    /// Look up a normalized path
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        if let Some(permission) = self.exact.get(path) {
            return Some(RouteMatch {
                rule: path.to_string(),
                permission: *permission,
                entity_type: None,
                entity_id: None,
            });
        }

        self.dynamic.iter().find_map(|route| {
            let params = route.pattern.captures(path)?;
            Some(RouteMatch {
                rule: route.pattern.as_str().to_string(),
                permission: route.permission,
                entity_type: route.entity,
                entity_id: params.entity_id().map(str::to_string),
            })
        })
    }

    /// Exact routes in declaration order
    pub fn exact_routes(&self) -> impl Iterator<Item = (&str, Permission)> + '_ {
        self.exact.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Dynamic routes in match order
    #[inline]
    #[must_use]
    pub fn dynamic_routes(&self) -> &[DynamicRoute] {
        &self.dynamic
    }

    /// Total number of routes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.dynamic.len()
    }

    /// Whether the table has no routes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.dynamic.is_empty()
    }
}

fn standard_dynamic() -> Vec<DynamicRoute> {
    STANDARD_DYNAMIC
        .iter()
        .filter_map(|(pattern, permission, entity)| {
            RoutePattern::compile(pattern)
                .map(|pattern| DynamicRoute {
                    pattern,
                    permission: *permission,
                    entity: *entity,
                })
                .map_err(|e| tracing::error!(error = %e, "standard route rejected"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_exact_routes() {
        let table = RoutePermissionTable::standard();
        let m = table.match_path("/settings").unwrap();
        assert_eq!(m.permission, Permission::ManageSettings);
        assert_eq!(m.entity_id, None);
        assert_eq!(table.dynamic_routes().len(), STANDARD_DYNAMIC.len());
    }

    #[test]
    fn standard_dynamic_routes_capture_entity() {
        let table = RoutePermissionTable::standard();
        let m = table.match_path("/agencies/A7").unwrap();
        assert_eq!(
            m,
            RouteMatch {
                rule: "/agencies/:id".into(),
                permission: Permission::ViewAgency,
                entity_type: Some(EntityKind::Agency),
                entity_id: Some("A7".into()),
            }
        );
    }

    #[test]
    fn unknown_path_has_no_rule() {
        let table = RoutePermissionTable::standard();
        assert!(table.match_path("/nowhere").is_none());
        assert!(table.match_path("/clients/C1/extra").is_none());
    }

    #[test]
    fn exact_wins_over_dynamic() {
        let mut table = RoutePermissionTable::standard();
        table.add_exact("/clients/new", Permission::ManageClient).unwrap();
        assert_eq!(
            table.match_path("/clients/new").unwrap().permission,
            Permission::ManageClient
        );
    }

    #[test]
    fn first_dynamic_match_wins() {
        let mut table = RoutePermissionTable::new();
        table
            .add_dynamic("/reports/:id", Permission::ViewReports, None)
            .unwrap();
        table
            .add_dynamic("/reports/:name", Permission::ManageSettings, None)
            .unwrap();
        assert_eq!(
            table.match_path("/reports/r1").unwrap().permission,
            Permission::ViewReports
        );
    }

    #[test]
    fn duplicates_rejected() {
        let mut table = RoutePermissionTable::new();
        table.add_exact("/tasks", Permission::ViewTasks).unwrap();
        assert_eq!(
            table.add_exact("/tasks/", Permission::ViewTasks),
            Err(RouteError::DuplicateRoute("/tasks".into()))
        );
        assert_eq!(
            table.add_exact("tasks", Permission::ViewTasks),
            Err(RouteError::RelativePath("tasks".into()))
        );
    }

    #[test]
    fn config_falls_back_per_section() {
        let config = RouteTableConfig {
            exact: vec![ExactRouteConfig {
                path: "/billing".into(),
                permission: Permission::ManageSettings,
            }],
            dynamic: Vec::new(),
        };
        let table = RoutePermissionTable::from_config(&config).unwrap();

        assert!(table.match_path("/tasks").is_none());
        assert!(table.match_path("/billing").is_some());
        assert!(table.match_path("/clients/C1").is_some());
    }
}
