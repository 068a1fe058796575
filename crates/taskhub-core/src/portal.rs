//! Portal orchestration
//!
//! Ties the pieces together for each path change:
//!
//! ```text
//! path ─→ RouteGuard ─┬─ Allow ──────→ NavigationResolver ─→ breadcrumbs + menu
//!                     ├─ Redirect ───→ Router::redirect
//!                     └─ ForceLogout ─→ session cleared, Router::logout + redirect
//! ```

use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::router::Router;
use crate::session::{Session, UserRecord};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use taskhub_access::{
    Decision, EntityScope, Permission, PermissionEvaluator, Principal, SharedAuditSink,
};
use taskhub_navigation::{
    normalize_path, visible_in, CachedLookup, ContextReader, EntityLookup, NavigationContext,
    NavigationOutcome, NavigationResolver, Scoped,
};
use taskhub_routing::{breadcrumbs, menu, Breadcrumb, GuardDecision, MenuItem, RouteGuard};

/// Lookup service as held by the portal
pub type SharedLookup = Arc<dyn EntityLookup>;

/// Everything the shell needs to render after a path change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalView {
    /// Normalized path
    pub path: String,
    /// Guard decision for the path
    pub decision: GuardDecision,
    /// Context after resolution
    pub context: NavigationContext,
    /// Breadcrumb trail; empty unless the path was allowed
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Sidebar; empty unless the path was allowed for a signed-in user
    pub menu: Vec<MenuItem>,
    /// Resolution result; `None` when the guard refused the path
    pub outcome: Option<NavigationOutcome>,
}

/// Portal core
pub struct Portal {
    config: PortalConfig,
    guard: RouteGuard,
    evaluator: PermissionEvaluator,
    resolver: NavigationResolver<SharedLookup>,
    router: Arc<dyn Router>,
    session: RwLock<Option<Session>>,
}

impl fmt::Debug for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portal")
            .field("session", &*self.session.read())
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Portal {
    /// Create portal
    ///
    /// Wraps `lookup` in a [`CachedLookup`] when the configuration enables
    /// the lookup cache.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the configuration is invalid.
    pub fn new(
        config: PortalConfig,
        lookup: SharedLookup,
        router: Arc<dyn Router>,
        audit: SharedAuditSink,
    ) -> Result<Self> {
        config.validate()?;

        let evaluator = PermissionEvaluator::new(Arc::clone(&audit));
        let guard = config.route_guard(evaluator.clone(), Arc::clone(&audit))?;

        let lookup: SharedLookup = if config.lookup_cache.enabled {
            Arc::new(CachedLookup::new(
                lookup,
                config.lookup_cache.max_capacity,
                config.lookup_cache.ttl(),
            ))
        } else {
            lookup
        };
        let resolver = NavigationResolver::new(lookup, audit);

        tracing::info!(
            routes = guard.table().len(),
            cache = config.lookup_cache.enabled,
            "portal ready"
        );

        Ok(Self {
            config,
            guard,
            evaluator,
            resolver,
            router,
            session: RwLock::new(None),
        })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Route guard in use
    #[inline]
    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Start a session and send the user to their landing page
    ///
    /// Any previous session and navigation context are discarded.
    pub fn login(&self, record: &UserRecord) -> Principal {
        let session = Session::start(record);
        let principal = session.principal.clone();
        let target = match session.role() {
            Some(role) => self.guard.landing_pages().for_role(role).to_string(),
            None => self.guard.entry_page().to_string(),
        };

        *self.session.write() = Some(session);
        self.resolver.reset();

        tracing::info!(user = %principal.user_id, role = ?principal.role, "signed in");
        self.router.redirect(&target);
        principal
    }

    /// End the session and go to the entry page
    pub fn logout(&self) {
        self.end_session();
        self.router.logout();
        self.router.redirect(self.guard.entry_page());
    }

    fn end_session(&self) {
        if let Some(session) = self.session.write().take() {
            tracing::info!(user = %session.principal.user_id, "signed out");
        }
        self.resolver.reset();
    }

    /// Whether a user is signed in
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.read().is_some()
    }

    /// Signed-in user
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NotSignedIn`] when nobody is signed in.
    pub fn principal(&self) -> Result<Principal> {
        self.session
            .read()
            .as_ref()
            .map(|s| s.principal.clone())
            .ok_or(PortalError::NotSignedIn)
    }

    /// Evaluate a permission for the signed-in user
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NotSignedIn`] when nobody is signed in.
    pub fn can(&self, permission: Permission, entity: EntityScope<'_>) -> Result<Decision> {
        let principal = self.principal()?;
        Ok(self.evaluator.evaluate(&principal, permission, entity))
    }

    /// Current navigation context
    #[must_use]
    pub fn context(&self) -> NavigationContext {
        self.resolver.snapshot()
    }

    /// Read handle on the navigation context
    #[must_use]
    pub fn subscribe(&self) -> ContextReader {
        self.resolver.subscribe()
    }

    /// Tags, SOPs and similar items visible in the current context
    #[must_use]
    pub fn visible<'a, T: Scoped>(&self, items: &'a [T]) -> Vec<&'a T> {
        visible_in(&self.resolver.snapshot(), items)
    }

    /// Handle a path change
    ///
    /// Applies the guard decision through the [`Router`], resolves the
    /// navigation context for allowed paths and projects breadcrumbs and
    /// menu for the result.
    pub async fn on_route_change(&self, path: &str) -> PortalView {
        let path = normalize_path(path).into_owned();
        let principal = self.session.read().as_ref().map(|s| s.principal.clone());
        let decision = self.guard.check(principal.as_ref(), &path);

        let outcome = match &decision {
            GuardDecision::Allow { route } => {
                let route = route.as_ref();
                let param = route.and_then(|r| r.entity_id.as_deref());
                let outcome = match route.and_then(|r| r.entity_type).zip(param) {
                    Some(target) => self.resolver.navigate_to(&path, Some(target)).await,
                    None => self.resolver.navigate(&path, param).await,
                };
                Some(outcome)
            }
            GuardDecision::Redirect { to, .. } => {
                self.router.redirect(to);
                None
            }
            GuardDecision::ForceLogout { to, .. } => {
                self.end_session();
                self.router.logout();
                self.router.redirect(to);
                None
            }
        };

        let context = self.resolver.snapshot();
        let (trail, items) = match principal.as_ref() {
            Some(principal) if decision.is_allowed() => {
                let landing = self.guard.landing_pages();
                let trail = principal
                    .role
                    .map(|role| breadcrumbs(role, &context, &path, landing))
                    .unwrap_or_default();
                (trail, menu(principal, &self.evaluator, landing, &path))
            }
            _ => (Vec::new(), Vec::new()),
        };

        tracing::debug!(
            path = %path,
            action = decision.action(),
            crumbs = trail.len(),
            "route change handled"
        );

        PortalView {
            path,
            decision,
            context,
            breadcrumbs: trail,
            menu: items,
            outcome,
        }
    }
}
