//! Testing utilities for the TaskHub workspace
//!
//! Shared fixtures, an in-memory entity directory, a lookup whose fetches
//! can be held and released per id, and a router that records calls.

#![allow(missing_docs)]

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskhub_access::{EntityKind, Principal, Role};
use taskhub_core::{Router, UserRecord};
use taskhub_navigation::{
    AgencyRecord, ClientRecord, EntityLabel, EntityLookup, LookupError, SystemRecord,
};
use tokio::sync::Semaphore;

// ---------------------------------------------------------------------------
// In-memory directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Row {
    name: String,
    parent: Option<String>,
}

/// Entity directory backed by concurrent maps
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    systems: DashMap<String, Row>,
    agencies: DashMap<String, Row>,
    clients: DashMap<String, Row>,
    failures: DashMap<String, LookupError>,
    calls: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(self, id: &str, name: &str) -> Self {
        self.systems.insert(
            id.into(),
            Row {
                name: name.into(),
                parent: None,
            },
        );
        self
    }

    pub fn with_agency(self, id: &str, name: &str, system_id: &str) -> Self {
        self.agencies.insert(
            id.into(),
            Row {
                name: name.into(),
                parent: Some(system_id.into()),
            },
        );
        self
    }

    pub fn with_client(self, id: &str, name: &str, agency_id: &str) -> Self {
        self.clients.insert(
            id.into(),
            Row {
                name: name.into(),
                parent: Some(agency_id.into()),
            },
        );
        self
    }

    /// Every later lookup of `id` fails with `error` until [`Self::heal`]
    pub fn fail(&self, id: &str, error: LookupError) {
        self.failures.insert(id.into(), error);
    }

    pub fn heal(&self, id: &str) {
        self.failures.remove(id);
    }

    pub fn rename_client(&self, id: &str, name: &str) {
        if let Some(mut row) = self.clients.get_mut(id) {
            row.name = name.into();
        }
    }

    /// Number of lookups served, failures included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, id: &str) -> Result<(), LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.get(id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn system_label(&self, id: &str) -> Option<EntityLabel> {
        self.systems.get(id).map(|row| EntityLabel::new(id, &row.name))
    }

    fn agency_row(&self, id: &str) -> Option<(EntityLabel, Option<String>)> {
        self.agencies
            .get(id)
            .map(|row| (EntityLabel::new(id, &row.name), row.parent.clone()))
    }
}

#[async_trait]
impl EntityLookup for InMemoryDirectory {
    async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError> {
        self.enter(id)?;
        self.system_label(id)
            .map(|label| SystemRecord {
                id: label.id,
                name: label.name,
            })
            .ok_or_else(|| LookupError::not_found(EntityKind::System, id))
    }

    async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError> {
        self.enter(id)?;
        let (label, system_id) = self
            .agency_row(id)
            .ok_or_else(|| LookupError::not_found(EntityKind::Agency, id))?;
        Ok(AgencyRecord {
            id: label.id,
            name: label.name,
            system: system_id.and_then(|s| self.system_label(&s)),
        })
    }

    async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError> {
        self.enter(id)?;
        let (name, agency_id) = self
            .clients
            .get(id)
            .map(|row| (row.name.clone(), row.parent.clone()))
            .ok_or_else(|| LookupError::not_found(EntityKind::Client, id))?;

        let agency = agency_id.and_then(|a| self.agency_row(&a));
        let system = agency
            .as_ref()
            .and_then(|(_, system_id)| system_id.as_deref())
            .and_then(|s| self.system_label(s));

        Ok(ClientRecord {
            id: id.into(),
            name,
            agency: agency.map(|(label, _)| label),
            system,
        })
    }
}

// ---------------------------------------------------------------------------
// Scripted lookup
// ---------------------------------------------------------------------------

/// Hold on one id's fetches
///
/// A fetch of a gated id signals `entered`, then waits for one `release`
/// permit before reaching the inner lookup.
#[derive(Debug, Clone)]
pub struct Gate {
    entered: Arc<Semaphore>,
    release: Arc<Semaphore>,
}

impl Gate {
    fn new() -> Self {
        Self {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        }
    }

    /// Wait until a fetch is parked on this gate
    pub async fn entered(&self) {
        self.entered.acquire().await.unwrap().forget();
    }

    /// Let one parked (or future) fetch through
    pub fn release(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.add_permits(1);
        self.release.acquire().await.unwrap().forget();
    }
}

/// Lookup that delegates to `inner`, parking fetches of gated ids
#[derive(Debug)]
pub struct ScriptedLookup<L = InMemoryDirectory> {
    inner: L,
    gates: DashMap<String, Gate>,
}

impl<L: EntityLookup> ScriptedLookup<L> {
    pub fn new(inner: L) -> Self {
        Self { inner, gates: DashMap::new() }
    }

    /// Gate every fetch of `id`
    pub fn gate(&self, id: &str) -> Gate {
        self.gates.entry(id.into()).or_insert_with(Gate::new).clone()
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    async fn hold(&self, id: &str) {
        let gate = self.gates.get(id).map(|g| g.value().clone());
        if let Some(gate) = gate {
            gate.pass().await;
        }
    }
}

#[async_trait]
impl<L: EntityLookup> EntityLookup for ScriptedLookup<L> {
    async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError> {
        self.hold(id).await;
        self.inner.get_system(id).await
    }

    async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError> {
        self.hold(id).await;
        self.inner.get_agency(id).await
    }

    async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError> {
        self.hold(id).await;
        self.inner.get_client(id).await
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    Redirect(String),
    Logout,
}

/// Router that remembers every call
#[derive(Debug, Default)]
pub struct RecordingRouter {
    events: Mutex<Vec<RouterEvent>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RouterEvent> {
        self.events.lock().clone()
    }

    pub fn last_redirect(&self) -> Option<String> {
        self.events.lock().iter().rev().find_map(|e| match e {
            RouterEvent::Redirect(to) => Some(to.clone()),
            RouterEvent::Logout => None,
        })
    }

    pub fn logouts(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| **e == RouterEvent::Logout)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Router for RecordingRouter {
    fn redirect(&self, to: &str) {
        self.events.lock().push(RouterEvent::Redirect(to.into()));
    }

    fn logout(&self) {
        self.events.lock().push(RouterEvent::Logout);
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Two systems, three agencies, four clients
///
/// ```text
/// S1 North ─┬─ A1 Acme ─┬─ C1 Globex
///           │           └─ C123 Initech
///           └─ A2 Bolt ──── C2 Hooli
/// S2 South ─── A3 Cobalt ── C3 Umbrella
/// ```
pub fn sample_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_system("S1", "North")
        .with_system("S2", "South")
        .with_agency("A1", "Acme", "S1")
        .with_agency("A2", "Bolt", "S1")
        .with_agency("A3", "Cobalt", "S2")
        .with_client("C1", "Globex", "A1")
        .with_client("C123", "Initech", "A1")
        .with_client("C2", "Hooli", "A2")
        .with_client("C3", "Umbrella", "A3")
}

pub fn system_admin() -> Principal {
    Principal::new("u-system", Role::SystemAdmin).with_system("S1")
}

pub fn agency_admin() -> Principal {
    Principal::new("u-agency", Role::AgencyAdmin)
        .with_system("S1")
        .with_agency("A1")
}

pub fn client_admin() -> Principal {
    Principal::new("u-client-admin", Role::ClientAdmin)
        .with_system("S1")
        .with_agency("A1")
        .with_client("C1")
}

pub fn client_user() -> Principal {
    Principal::new("u-client-user", Role::ClientUser)
        .with_system("S1")
        .with_agency("A1")
        .with_client("C1")
}

pub fn principal_for(role: Role) -> Principal {
    match role {
        Role::SystemAdmin => system_admin(),
        Role::AgencyAdmin => agency_admin(),
        Role::ClientAdmin => client_admin(),
        Role::ClientUser => client_user(),
    }
}

/// Identity-provider record matching [`principal_for`]
pub fn user_record(role: Role) -> UserRecord {
    let p = principal_for(role);
    UserRecord {
        id: p.user_id,
        role: Some(role.as_str().into()),
        system_id: p.system_id,
        agency_id: p.agency_id,
        client_id: p.client_id,
    }
}
