//! Signed-in principal and entity references

use crate::role::{EntityKind, Role};
use serde::{Deserialize, Serialize};

/// The signed-in user as seen by the access layer
///
/// Scope identifiers describe the user's home assignment, not the entity
/// currently being viewed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User identifier
    pub user_id: String,
    /// Assigned role; `None` denies every check
    pub role: Option<Role>,
    /// Home system
    pub system_id: Option<String>,
    /// Home agency
    pub agency_id: Option<String>,
    /// Home client
    pub client_id: Option<String>,
}

impl Principal {
    /// Create principal with a role and no scope
    #[inline]
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role: Some(role),
            ..Self::default()
        }
    }

    /// Principal without a role
    #[inline]
    #[must_use]
    pub fn without_role(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// With home system
    #[inline]
    #[must_use]
    pub fn with_system(mut self, id: impl Into<String>) -> Self {
        self.system_id = Some(id.into());
        self
    }

    /// With home agency
    #[inline]
    #[must_use]
    pub fn with_agency(mut self, id: impl Into<String>) -> Self {
        self.agency_id = Some(id.into());
        self
    }

    /// With home client
    #[inline]
    #[must_use]
    pub fn with_client(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Home scope identifier for a hierarchy level
    #[inline]
    #[must_use]
    pub fn scope_id(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::System => self.system_id.as_deref(),
            EntityKind::Agency => self.agency_id.as_deref(),
            EntityKind::Client => self.client_id.as_deref(),
        }
    }
}

/// Entity an evaluation is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityScope<'a> {
    /// Entity identifier
    pub id: Option<&'a str>,
    /// Entity type; when absent the permission's own level is used
    pub kind: Option<EntityKind>,
}

impl<'a> EntityScope<'a> {
    /// No entity
    pub const NONE: EntityScope<'static> = EntityScope {
        id: None,
        kind: None,
    };

    /// Entity id with explicit kind
    #[inline]
    #[must_use]
    pub fn new(id: &'a str, kind: EntityKind) -> Self {
        Self {
            id: Some(id),
            kind: Some(kind),
        }
    }

    /// Entity id only
    #[inline]
    #[must_use]
    pub fn id(id: &'a str) -> Self {
        Self {
            id: Some(id),
            kind: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_id_lookup() {
        let p = Principal::new("u1", Role::ClientUser)
            .with_system("s1")
            .with_agency("a1")
            .with_client("c1");

        assert_eq!(p.scope_id(EntityKind::System), Some("s1"));
        assert_eq!(p.scope_id(EntityKind::Agency), Some("a1"));
        assert_eq!(p.scope_id(EntityKind::Client), Some("c1"));
    }

    #[test]
    fn without_role_has_no_scope() {
        let p = Principal::without_role("u2");
        assert!(p.role.is_none());
        assert!(p.scope_id(EntityKind::System).is_none());
    }
}
