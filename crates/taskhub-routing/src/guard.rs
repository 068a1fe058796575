//! Route guard
//!
//! Decides, for each path change, whether the signed-in user may stay on the
//! page. A denied rule sends the user back to their landing page; a path the
//! table does not know and that is not exempt ends the session.

use crate::landing::LandingPages;
use crate::table::{RouteMatch, RoutePermissionTable};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use taskhub_access::{
    emit, AuditLevel, AuditRecord, EntityScope, PermissionEvaluator, Principal, SharedAuditSink,
    TracingAuditSink,
};
use taskhub_navigation::normalize_path;

/// Default unauthenticated entry page
pub const DEFAULT_ENTRY_PAGE: &str = "/login";

/// Paths allowed without a matching rule
pub const DEFAULT_EXEMPT_PATHS: [&str; 5] = [
    "/",
    "/login",
    "/reset-password",
    "/update-password",
    "/profile",
];

/// Reason given to anonymous users
pub const REASON_NOT_SIGNED_IN: &str = "not signed in";

/// Reason given for unmapped paths
pub const REASON_NO_ROUTE: &str = "no route rule";

/// Outcome of a route check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Stay on the page
    Allow {
        /// Rule that granted access; `None` for exempt paths
        route: Option<RouteMatch>,
    },
    /// Navigate elsewhere
    Redirect {
        /// Target path
        to: String,
        /// Why access was refused
        reason: String,
    },
    /// End the session and go to the entry page
    ForceLogout {
        /// Entry page
        to: String,
        /// Why the session ends
        reason: String,
    },
}

impl GuardDecision {
    /// Whether the user stays on the page
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Short action name for logs
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "allow",
            Self::Redirect { .. } => "redirect",
            Self::ForceLogout { .. } => "force_logout",
        }
    }
}

/// Route guard
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RoutePermissionTable,
    evaluator: PermissionEvaluator,
    landing: LandingPages,
    entry_page: String,
    exempt: BTreeSet<String>,
    audit: SharedAuditSink,
}

impl RouteGuard {
    /// Create guard with default landing, entry and exempt pages
    #[must_use]
    pub fn new(
        table: RoutePermissionTable,
        evaluator: PermissionEvaluator,
        audit: SharedAuditSink,
    ) -> Self {
        Self {
            table,
            evaluator,
            landing: LandingPages::default(),
            entry_page: DEFAULT_ENTRY_PAGE.to_string(),
            exempt: DEFAULT_EXEMPT_PATHS.iter().map(|p| (*p).to_string()).collect(),
            audit,
        }
    }

    /// Override landing pages
    #[must_use]
    pub fn with_landing_pages(mut self, landing: LandingPages) -> Self {
        self.landing = landing;
        self
    }

    /// Override the entry page
    #[must_use]
    pub fn with_entry_page(mut self, entry_page: impl Into<String>) -> Self {
        self.entry_page = entry_page.into();
        self
    }

    /// Replace the exempt path set
    #[must_use]
    pub fn with_exempt_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exempt = paths
            .into_iter()
            .map(|p| normalize_path(p.as_ref()).into_owned())
            .collect();
        self
    }

    /// Route table in use
    #[inline]
    #[must_use]
    pub fn table(&self) -> &RoutePermissionTable {
        &self.table
    }

    /// Landing pages in use
    #[inline]
    #[must_use]
    pub fn landing_pages(&self) -> &LandingPages {
        &self.landing
    }

    /// Entry page in use
    #[inline]
    #[must_use]
    pub fn entry_page(&self) -> &str {
        &self.entry_page
    }

    /// Whether a normalized path is exempt; the entry page always is
    #[inline]
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        path == self.entry_page || self.exempt.contains(path)
    }

    /// Check a path change
    ///
    /// # Arguments
    /// * `principal` - Signed-in user, `None` when anonymous
    /// * `path` - Raw path; query and fragment are ignored
    pub fn check(&self, principal: Option<&Principal>, path: &str) -> GuardDecision {
        let path = normalize_path(path);
        let decision = match principal {
            None => self.check_anonymous(&path),
            Some(principal) => self.check_signed_in(principal, &path),
        };
        self.report(principal, &path, &decision);
        decision
    }

    fn check_anonymous(&self, path: &str) -> GuardDecision {
        if self.is_exempt(path) {
            GuardDecision::Allow { route: None }
        } else {
            GuardDecision::Redirect {
                to: self.entry_page.clone(),
                reason: REASON_NOT_SIGNED_IN.to_string(),
            }
        }
    }

    fn check_signed_in(&self, principal: &Principal, path: &str) -> GuardDecision {
        let Some(route) = self.table.match_path(path) else {
            if self.is_exempt(path) {
                return GuardDecision::Allow { route: None };
            }
            return GuardDecision::ForceLogout {
                to: self.entry_page.clone(),
                reason: REASON_NO_ROUTE.to_string(),
            };
        };

        let scope = EntityScope {
            id: route.entity_id.as_deref(),
            kind: route.entity_type,
        };
        let decision = self.evaluator.evaluate(principal, route.permission, scope);
        if decision.granted {
            return GuardDecision::Allow { route: Some(route) };
        }

        let to = principal
            .role
            .map_or(self.entry_page.as_str(), |role| self.landing.for_role(role));
        GuardDecision::Redirect {
            to: to.to_string(),
            reason: decision.reason,
        }
    }

    fn report(&self, principal: Option<&Principal>, path: &str, decision: &GuardDecision) {
        let user = principal.map(|p| p.user_id.as_str());
        let level = match decision {
            GuardDecision::Allow { .. } => {
                tracing::debug!(?user, path, "route allowed");
                AuditLevel::Debug
            }
            GuardDecision::Redirect { to, reason } => {
                tracing::info!(?user, path, to = %to, reason = %reason, "route redirected");
                AuditLevel::Warn
            }
            GuardDecision::ForceLogout { to, reason } => {
                tracing::warn!(?user, path, to = %to, reason = %reason, "route forced logout");
                AuditLevel::Error
            }
        };

        let record = AuditRecord::new(level, "route", format!("route {}", decision.action()))
            .with_details(serde_json::json!({
                "user_id": user,
                "path": path,
                "decision": decision,
            }));
        emit(self.audit.as_ref(), record);
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(
            RoutePermissionTable::standard(),
            PermissionEvaluator::default(),
            Arc::new(TracingAuditSink),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskhub_access::{MemoryAuditSink, NullAuditSink, Role};

    fn guard() -> RouteGuard {
        RouteGuard::new(
            RoutePermissionTable::standard(),
            PermissionEvaluator::new(Arc::new(NullAuditSink)),
            Arc::new(NullAuditSink),
        )
    }

    fn agency_admin() -> Principal {
        Principal::new("u-agency", Role::AgencyAdmin)
            .with_system("S1")
            .with_agency("A1")
    }

    #[test]
    fn granted_rule_allows() {
        let decision = guard().check(Some(&agency_admin()), "/agencies/A1?tab=users");
        match decision {
            GuardDecision::Allow { route: Some(route) } => {
                assert_eq!(route.entity_id.as_deref(), Some("A1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn denied_rule_redirects_to_landing() {
        let decision = guard().check(Some(&agency_admin()), "/agencies/A2");
        assert!(matches!(
            decision,
            GuardDecision::Redirect { ref to, .. } if to == "/dashboard"
        ));
    }

    #[test]
    fn unknown_route_forces_logout() {
        assert_eq!(
            guard().check(Some(&agency_admin()), "/does-not-exist"),
            GuardDecision::ForceLogout {
                to: DEFAULT_ENTRY_PAGE.into(),
                reason: REASON_NO_ROUTE.into(),
            }
        );
    }

    #[test]
    fn exempt_path_without_rule_allowed() {
        assert_eq!(
            guard().check(Some(&agency_admin()), "/profile/"),
            GuardDecision::Allow { route: None }
        );
    }

    #[test]
    fn anonymous_user_sent_to_entry_page() {
        let g = guard().with_entry_page("/sign-in");
        assert_eq!(g.check(None, "/login"), GuardDecision::Allow { route: None });
        assert_eq!(g.check(None, "/sign-in"), GuardDecision::Allow { route: None });
        assert_eq!(
            g.check(None, "/tasks"),
            GuardDecision::Redirect {
                to: "/sign-in".into(),
                reason: REASON_NOT_SIGNED_IN.into(),
            }
        );
    }

    #[test]
    fn user_without_role_goes_to_entry_page() {
        let decision = guard().check(Some(&Principal::without_role("u0")), "/tasks");
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                to: DEFAULT_ENTRY_PAGE.into(),
                reason: "no role".into(),
            }
        );
    }

    #[test]
    fn custom_landing_page_used_on_denial() {
        let landing = LandingPages {
            client_user: "/tasks".into(),
            ..LandingPages::default()
        };
        let user = Principal::new("u1", Role::ClientUser).with_client("C1");
        let decision = guard().with_landing_pages(landing).check(Some(&user), "/settings");
        assert!(matches!(decision, GuardDecision::Redirect { ref to, .. } if to == "/tasks"));
    }

    #[test]
    fn decisions_are_audited() {
        let audit = Arc::new(MemoryAuditSink::new(16));
        let g = RouteGuard::new(
            RoutePermissionTable::standard(),
            PermissionEvaluator::new(Arc::new(NullAuditSink)),
            audit.clone(),
        );
        g.check(Some(&agency_admin()), "/nowhere");

        let records = audit.by_category("route");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, AuditLevel::Error);
        assert_eq!(records[0].details["decision"]["action"], "force_logout");
    }
}
