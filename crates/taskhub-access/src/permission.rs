//! Closed permission set
//!
//! Fourteen permission kinds: view/manage for the three hierarchy levels,
//! tasks, users and SOPs, plus `view_reports` and `manage_settings`.

use crate::error::AccessError;
use crate::role::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission kind checked against a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View a system
    ViewSystem,
    /// Create/edit/delete systems
    ManageSystem,
    /// View an agency
    ViewAgency,
    /// Create/edit/delete agencies
    ManageAgency,
    /// View a client
    ViewClient,
    /// Create/edit/delete clients
    ManageClient,
    /// View tasks
    ViewTasks,
    /// Create/edit/assign tasks
    ManageTasks,
    /// View users
    ViewUsers,
    /// Invite/edit/remove users
    ManageUsers,
    /// View SOPs
    ViewSops,
    /// Create/edit SOPs
    ManageSops,
    /// View reports
    ViewReports,
    /// Change settings
    ManageSettings,
}

impl Permission {
    /// Every permission, in declaration order
    pub const ALL: [Permission; 14] = [
        Permission::ViewSystem,
        Permission::ManageSystem,
        Permission::ViewAgency,
        Permission::ManageAgency,
        Permission::ViewClient,
        Permission::ManageClient,
        Permission::ViewTasks,
        Permission::ManageTasks,
        Permission::ViewUsers,
        Permission::ManageUsers,
        Permission::ViewSops,
        Permission::ManageSops,
        Permission::ViewReports,
        Permission::ManageSettings,
    ];

    /// Wire name (snake_case)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewSystem => "view_system",
            Self::ManageSystem => "manage_system",
            Self::ViewAgency => "view_agency",
            Self::ManageAgency => "manage_agency",
            Self::ViewClient => "view_client",
            Self::ManageClient => "manage_client",
            Self::ViewTasks => "view_tasks",
            Self::ManageTasks => "manage_tasks",
            Self::ViewUsers => "view_users",
            Self::ManageUsers => "manage_users",
            Self::ViewSops => "view_sops",
            Self::ManageSops => "manage_sops",
            Self::ViewReports => "view_reports",
            Self::ManageSettings => "manage_settings",
        }
    }

    /// Hierarchy level this permission is about, if any
    #[inline]
    #[must_use]
    pub fn level(self) -> Option<EntityKind> {
        match self {
            Self::ViewSystem | Self::ManageSystem => Some(EntityKind::System),
            Self::ViewAgency | Self::ManageAgency => Some(EntityKind::Agency),
            Self::ViewClient | Self::ManageClient => Some(EntityKind::Client),
            _ => None,
        }
    }

    /// Whether this is a manage-* permission
    #[inline]
    #[must_use]
    pub fn is_manage(self) -> bool {
        self.as_str().starts_with("manage_")
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AccessError::UnknownPermission(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_distinct_permissions() {
        let mut names: Vec<_> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn parse_roundtrip_and_unknown() {
        assert_eq!("view_sops".parse::<Permission>().unwrap(), Permission::ViewSops);
        assert_eq!(
            "view_settings".parse::<Permission>(),
            Err(AccessError::UnknownPermission("view_settings".into()))
        );
    }

    #[test]
    fn levels() {
        assert_eq!(Permission::ManageAgency.level(), Some(EntityKind::Agency));
        assert_eq!(Permission::ViewClient.level(), Some(EntityKind::Client));
        assert_eq!(Permission::ViewTasks.level(), None);
    }

    #[test]
    fn manage_flag() {
        assert!(Permission::ManageTasks.is_manage());
        assert!(!Permission::ViewReports.is_manage());
    }
}
