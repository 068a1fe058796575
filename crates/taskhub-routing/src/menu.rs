//! Sidebar menu
//!
//! Items the user lacks permission for are omitted, never shown disabled.

use crate::landing::LandingPages;
use serde::{Deserialize, Serialize};
use taskhub_access::{EntityScope, Permission, PermissionEvaluator, Principal};
use taskhub_navigation::normalize_path;

/// Static menu definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// Display label
    pub label: &'static str,
    /// Link target; `None` means the role's landing page
    pub href: Option<&'static str>,
    /// Permission gating the entry
    pub permission: Permission,
}

/// Sidebar entries in display order
pub const STANDARD_MENU: [MenuEntry; 9] = [
    MenuEntry {
        label: "Dashboard",
        href: None,
        permission: Permission::ViewTasks,
    },
    MenuEntry {
        label: "Systems",
        href: Some("/systems"),
        permission: Permission::ViewSystem,
    },
    MenuEntry {
        label: "Agencies",
        href: Some("/agencies"),
        permission: Permission::ViewAgency,
    },
    MenuEntry {
        label: "Clients",
        href: Some("/clients"),
        permission: Permission::ViewClient,
    },
    MenuEntry {
        label: "Tasks",
        href: Some("/tasks"),
        permission: Permission::ViewTasks,
    },
    MenuEntry {
        label: "Users",
        href: Some("/users"),
        permission: Permission::ViewUsers,
    },
    MenuEntry {
        label: "SOPs",
        href: Some("/sops"),
        permission: Permission::ViewSops,
    },
    MenuEntry {
        label: "Reports",
        href: Some("/reports"),
        permission: Permission::ViewReports,
    },
    MenuEntry {
        label: "Settings",
        href: Some("/settings"),
        permission: Permission::ManageSettings,
    },
];

/// Rendered menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Display label
    pub label: String,
    /// Link target
    pub href: String,
    /// Whether the current path lives under this item
    pub active: bool,
}

/// Menu for a signed-in user
///
/// # Arguments
/// * `principal` - Signed-in user
/// * `evaluator` - Permission evaluator; each entry is checked without an entity
/// * `landing` - Landing pages, used as the dashboard href
/// * `current_path` - Path being shown, for the active marker
pub fn menu(
    principal: &Principal,
    evaluator: &PermissionEvaluator,
    landing: &LandingPages,
    current_path: &str,
) -> Vec<MenuItem> {
    let Some(role) = principal.role else {
        return Vec::new();
    };
    let current = normalize_path(current_path);

    STANDARD_MENU
        .iter()
        .filter(|entry| evaluator.is_granted(principal, entry.permission, EntityScope::NONE))
        .map(|entry| {
            let href = match entry.href {
                Some(href) => href,
                None => landing.for_role(role),
            };
            MenuItem {
                label: entry.label.to_string(),
                href: href.to_string(),
                active: is_under(&current, href),
            }
        })
        .collect()
}

fn is_under(path: &str, href: &str) -> bool {
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use taskhub_access::{NullAuditSink, Role};

    fn labels(principal: &Principal, path: &str) -> Vec<String> {
        let evaluator = PermissionEvaluator::new(Arc::new(NullAuditSink));
        menu(principal, &evaluator, &LandingPages::default(), path)
            .into_iter()
            .map(|item| item.label)
            .collect()
    }

    #[test]
    fn client_user_menu() {
        let user = Principal::new("u1", Role::ClientUser).with_client("C1");
        assert_eq!(
            labels(&user, "/tasks"),
            vec!["Dashboard", "Clients", "Tasks", "SOPs", "Reports"]
        );
    }

    #[test]
    fn system_admin_sees_everything() {
        let admin = Principal::new("u0", Role::SystemAdmin).with_system("S1");
        assert_eq!(labels(&admin, "/").len(), STANDARD_MENU.len());
    }

    #[test]
    fn agency_admin_has_no_systems_entry() {
        let admin = Principal::new("u2", Role::AgencyAdmin).with_agency("A1");
        let items = labels(&admin, "/");
        assert!(!items.contains(&"Systems".to_string()));
        assert!(items.contains(&"Agencies".to_string()));
    }

    #[test]
    fn roleless_user_gets_no_menu() {
        assert!(labels(&Principal::without_role("u3"), "/").is_empty());
    }

    #[test]
    fn active_marker_follows_path() {
        let user = Principal::new("u1", Role::ClientAdmin).with_client("C1");
        let evaluator = PermissionEvaluator::new(Arc::new(NullAuditSink));
        let items = menu(&user, &evaluator, &LandingPages::default(), "/clients/C1?x=1");
        let active: Vec<_> = items.iter().filter(|i| i.active).map(|i| i.label.as_str()).collect();
        assert_eq!(active, vec!["Clients"]);
    }
}
