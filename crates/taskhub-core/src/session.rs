//! Signed-in session
//!
//! The identity provider hands over a [`UserRecord`] at login. Its role is a
//! free-form string; anything outside the four known roles yields a
//! principal without a role, which every permission check denies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhub_access::{Principal, Role};

/// User record as delivered by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id
    pub id: String,
    /// Role name, if assigned
    #[serde(default)]
    pub role: Option<String>,
    /// Home system
    #[serde(default)]
    pub system_id: Option<String>,
    /// Home agency
    #[serde(default)]
    pub agency_id: Option<String>,
    /// Home client
    #[serde(default)]
    pub client_id: Option<String>,
}

impl UserRecord {
    /// Create record with a role name
    #[must_use]
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Some(role.into()),
            ..Self::default()
        }
    }

    /// Principal derived from this record
    #[must_use]
    pub fn to_principal(&self) -> Principal {
        let role = self.role.as_deref().and_then(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(user = %self.id, error = %e, "unrecognized role, treating as none");
                None
            }
        });

        Principal {
            user_id: self.id.clone(),
            role,
            system_id: self.system_id.clone(),
            agency_id: self.agency_id.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

/// Active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user
    pub principal: Principal,
    /// Login time
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for a record
    #[must_use]
    pub fn start(record: &UserRecord) -> Self {
        Self {
            principal: record.to_principal(),
            started_at: Utc::now(),
        }
    }

    /// Role of the signed-in user
    #[inline]
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.principal.role
    }
}
