//! Entity lookup service
//!
//! The persistence layer is external; this trait is the contract the
//! resolver needs from it. Agency and client lookups return their ancestry
//! so a single fetch can populate the whole context.

use crate::context::EntityLabel;
use crate::error::LookupError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// System row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    /// System id
    pub id: String,
    /// Display name
    pub name: String,
}

impl SystemRecord {
    /// Label for the navigation context
    #[inline]
    #[must_use]
    pub fn label(&self) -> EntityLabel {
        EntityLabel::new(&self.id, &self.name)
    }
}

/// Agency row with its owning system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyRecord {
    /// Agency id
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning system, when the relationship resolved
    pub system: Option<EntityLabel>,
}

impl AgencyRecord {
    /// Label for the navigation context
    #[inline]
    #[must_use]
    pub fn label(&self) -> EntityLabel {
        EntityLabel::new(&self.id, &self.name)
    }
}

/// Client row with its owning agency and system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client id
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning agency
    pub agency: Option<EntityLabel>,
    /// Owning system (via the agency)
    pub system: Option<EntityLabel>,
}

impl ClientRecord {
    /// Label for the navigation context
    #[inline]
    #[must_use]
    pub fn label(&self) -> EntityLabel {
        EntityLabel::new(&self.id, &self.name)
    }
}

/// Read access to hierarchy entities
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Fetch a system
    ///
    /// # Errors
    /// `LookupError` when the system is missing or the backend fails.
    async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError>;

    /// Fetch an agency together with its owning system
    ///
    /// # Errors
    /// `LookupError` when the agency is missing or the backend fails.
    async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError>;

    /// Fetch a client together with its agency and system
    ///
    /// # Errors
    /// `LookupError` when the client is missing or the backend fails.
    async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError>;
}

#[async_trait]
impl<T: EntityLookup + ?Sized> EntityLookup for Arc<T> {
    async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError> {
        (**self).get_system(id).await
    }

    async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError> {
        (**self).get_agency(id).await
    }

    async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError> {
        (**self).get_client(id).await
    }
}
