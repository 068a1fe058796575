//! Navigation context resolver
//!
//! Owns the only writable handle to the [`NavigationContext`]. Each path
//! change takes a monotonic ticket; a fetch that completes after a newer
//! navigation began is discarded, so the last navigation always wins.
//!
//! ```text
//! path change → RouteState::classify → ticket → (fetch) → commit if current
//!                                                           ↓
//!                                  watch channel → ContextReader snapshots
//! ```

use crate::context::NavigationContext;
use crate::error::{LookupError, ResolveError};
use crate::lookup::EntityLookup;
use crate::route_state::RouteState;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use taskhub_access::{emit, AuditLevel, AuditRecord, EntityKind, SharedAuditSink};
use tokio::sync::watch;

/// Sequence number of one navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationTicket(pub u64);

impl fmt::Display for NavigationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of resolving one path change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Context changed to this value
    Updated(NavigationContext),
    /// Context kept its value
    Unchanged,
    /// A newer navigation started before this one finished; result dropped
    Superseded,
    /// Entity lookup failed; context kept its value
    Failed(ResolveError),
}

impl NavigationOutcome {
    /// Whether the context was written
    #[inline]
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    /// Lookup failure, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&ResolveError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Updated(_) => "updated",
            Self::Unchanged => "unchanged",
            Self::Superseded => "superseded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Read-only view of the navigation context
#[derive(Debug, Clone)]
pub struct ContextReader {
    rx: watch::Receiver<NavigationContext>,
}

impl ContextReader {
    /// Current value
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> NavigationContext {
        self.rx.borrow().clone()
    }

    /// Wait for the next change
    ///
    /// Returns `None` once the resolver has been dropped.
    pub async fn changed(&mut self) -> Option<NavigationContext> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Single writer of the navigation context
pub struct NavigationResolver<L> {
    lookup: L,
    state: watch::Sender<NavigationContext>,
    latest: AtomicU64,
    audit: SharedAuditSink,
}

impl<L> fmt::Debug for NavigationResolver<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationResolver")
            .field("context", &*self.state.borrow())
            .field("latest", &self.latest.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<L: EntityLookup> NavigationResolver<L> {
    /// Create resolver with an empty context
    #[must_use]
    pub fn new(lookup: L, audit: SharedAuditSink) -> Self {
        let (state, _) = watch::channel(NavigationContext::default());
        Self {
            lookup,
            state,
            latest: AtomicU64::new(0),
            audit,
        }
    }

    /// New read-only handle
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> ContextReader {
        ContextReader {
            rx: self.state.subscribe(),
        }
    }

    /// Current context
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> NavigationContext {
        self.state.borrow().clone()
    }

    /// Ticket of the most recent navigation
    #[inline]
    #[must_use]
    pub fn current_ticket(&self) -> NavigationTicket {
        NavigationTicket(self.latest.load(Ordering::SeqCst))
    }

    /// Underlying lookup service
    #[inline]
    #[must_use]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolve the context for a path change
    ///
    /// # Arguments
    /// * `path` - New route path
    /// * `param` - Entity id from the router, for parameterized paths
    ///
    /// # Returns
    /// What happened to the context. Lookup failures are reported as
    /// [`NavigationOutcome::Failed`] and leave the context untouched.
    pub async fn navigate(&self, path: &str, param: Option<&str>) -> NavigationOutcome {
        self.enter(path, RouteState::classify(path, param)).await
    }

    /// Resolve the context for a path whose route names its entity
    ///
    /// `target` is the matched route's entity kind and id. It takes
    /// precedence over the path's first segment.
    pub async fn navigate_to(
        &self,
        path: &str,
        target: Option<(EntityKind, &str)>,
    ) -> NavigationOutcome {
        self.enter(path, RouteState::classify_target(path, target)).await
    }

    async fn enter(&self, path: &str, state: RouteState) -> NavigationOutcome {
        let ticket = self.begin();
        tracing::debug!(%ticket, path, state = state.name(), "navigation started");

        let outcome = self.resolve(ticket, &state).await;
        self.report(path, &state, ticket, &outcome);
        outcome
    }

    /// Clear the context and drop any in-flight resolution
    pub fn reset(&self) -> NavigationOutcome {
        let ticket = self.begin();
        let outcome = self.commit(ticket, NavigationContext::clear);
        self.report("<reset>", &RouteState::Root, ticket, &outcome);
        outcome
    }

    fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    async fn resolve(&self, ticket: NavigationTicket, state: &RouteState) -> NavigationOutcome {
        match state {
            RouteState::Root => self.commit(ticket, NavigationContext::clear),
            RouteState::SystemList => {
                self.commit(ticket, |ctx| ctx.clear_below(EntityKind::System))
            }
            RouteState::AgencyList => {
                self.commit(ticket, |ctx| ctx.clear_below(EntityKind::Agency))
            }
            RouteState::ClientList | RouteState::Other => NavigationOutcome::Unchanged,
            RouteState::SystemDetail(id) => match self.lookup.get_system(id).await {
                Ok(system) => {
                    let label = system.label();
                    self.commit(ticket, move |ctx| {
                        ctx.current_system = Some(label);
                        ctx.clear_below(EntityKind::System);
                    })
                }
                Err(e) => self.fail(ticket, EntityKind::System, id, e),
            },
            RouteState::AgencyDetail(id) => match self.lookup.get_agency(id).await {
                Ok(agency) => {
                    let label = agency.label();
                    self.commit(ticket, move |ctx| {
                        if agency.system.is_some() {
                            ctx.current_system = agency.system;
                        }
                        ctx.current_agency = Some(label);
                        ctx.current_client = None;
                    })
                }
                Err(e) => self.fail(ticket, EntityKind::Agency, id, e),
            },
            RouteState::ClientDetail(id) => match self.lookup.get_client(id).await {
                Ok(client) => {
                    let label = client.label();
                    self.commit(ticket, move |ctx| {
                        ctx.current_system = client.system;
                        ctx.current_agency = client.agency;
                        ctx.current_client = Some(label);
                    })
                }
                Err(e) => self.fail(ticket, EntityKind::Client, id, e),
            },
        }
    }

    /// Apply `change` if `ticket` is still the latest navigation
    fn commit(
        &self,
        ticket: NavigationTicket,
        change: impl FnOnce(&mut NavigationContext),
    ) -> NavigationOutcome {
        let mut outcome = NavigationOutcome::Superseded;
        // ticket check happens under the channel's write lock
        self.state.send_if_modified(|ctx| {
            if !self.is_current(ticket) {
                return false;
            }
            let before = ctx.clone();
            change(ctx);
            if *ctx == before {
                outcome = NavigationOutcome::Unchanged;
                false
            } else {
                outcome = NavigationOutcome::Updated(ctx.clone());
                true
            }
        });
        outcome
    }

    fn fail(
        &self,
        ticket: NavigationTicket,
        kind: EntityKind,
        id: &str,
        error: LookupError,
    ) -> NavigationOutcome {
        if self.is_current(ticket) {
            NavigationOutcome::Failed(ResolveError::new(kind, id, error))
        } else {
            tracing::debug!(%ticket, %kind, id, %error, "stale lookup failure ignored");
            NavigationOutcome::Superseded
        }
    }

    fn report(
        &self,
        path: &str,
        state: &RouteState,
        ticket: NavigationTicket,
        outcome: &NavigationOutcome,
    ) {
        let (level, message) = match outcome {
            NavigationOutcome::Updated(ctx) => {
                tracing::info!(
                    %ticket,
                    path,
                    state = state.name(),
                    ?ctx,
                    "navigation context updated"
                );
                (AuditLevel::Info, "navigation context updated")
            }
            NavigationOutcome::Unchanged => (AuditLevel::Debug, "navigation context unchanged"),
            NavigationOutcome::Superseded => {
                tracing::debug!(%ticket, path, "stale navigation result discarded");
                (AuditLevel::Debug, "stale navigation result discarded")
            }
            NavigationOutcome::Failed(e) => {
                tracing::warn!(%ticket, path, error = %e, "entity resolution failed");
                (AuditLevel::Error, "entity resolution failed")
            }
        };

        let mut details = serde_json::json!({
            "path": path,
            "state": state.name(),
            "ticket": ticket.0,
            "outcome": outcome.name(),
        });
        if let NavigationOutcome::Updated(ctx) = outcome {
            details["context"] = serde_json::to_value(ctx).unwrap_or_default();
        }
        if let NavigationOutcome::Failed(e) = outcome {
            details["entity_type"] = e.kind.as_str().into();
            details["entity_id"] = e.id.clone().into();
            details["error"] = e.source.to_string().into();
        }
        emit(
            self.audit.as_ref(),
            AuditRecord::new(level, "navigation", message).with_details(details),
        );
    }
}
