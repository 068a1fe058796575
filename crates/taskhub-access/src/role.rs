//! Roles and hierarchy levels
//!
//! The tenant hierarchy has three levels (system → agency → client) and four
//! fixed roles. A role is assigned per user at login and never changes for
//! the life of a session.

use crate::error::AccessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role within the tenant hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administers one system and everything below it
    SystemAdmin,
    /// Administers one agency and its clients
    AgencyAdmin,
    /// Administers one client
    ClientAdmin,
    /// Regular member of one client
    ClientUser,
}

impl Role {
    /// All roles, most privileged first
    pub const ALL: [Role; 4] = [
        Role::SystemAdmin,
        Role::AgencyAdmin,
        Role::ClientAdmin,
        Role::ClientUser,
    ];

    /// Wire name (snake_case)
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemAdmin => "system_admin",
            Self::AgencyAdmin => "agency_admin",
            Self::ClientAdmin => "client_admin",
            Self::ClientUser => "client_user",
        }
    }

    /// Hierarchy level the role's home scope is bound to
    #[inline]
    #[must_use]
    pub fn home_level(self) -> EntityKind {
        match self {
            Self::SystemAdmin => EntityKind::System,
            Self::AgencyAdmin => EntityKind::Agency,
            Self::ClientAdmin | Self::ClientUser => EntityKind::Client,
        }
    }

    /// Human readable title
    #[inline]
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SystemAdmin => "System Admin",
            Self::AgencyAdmin => "Agency Admin",
            Self::ClientAdmin => "Client Admin",
            Self::ClientUser => "Client User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}

/// Level in the system → agency → client hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Top-level tenant
    System,
    /// Agency owned by a system
    Agency,
    /// Client owned by an agency
    Client,
}

impl EntityKind {
    /// All kinds, root first
    pub const ALL: [EntityKind; 3] = [EntityKind::System, EntityKind::Agency, EntityKind::Client];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Agency => "agency",
            Self::Client => "client",
        }
    }

    /// Depth in the hierarchy (system = 0)
    #[inline]
    #[must_use]
    pub fn depth(self) -> usize {
        match self {
            Self::System => 0,
            Self::Agency => 1,
            Self::Client => 2,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AccessError::UnknownEntityKind(s.to_string()))
    }
}
