//! Breadcrumb trail
//!
//! Pure projection of role, navigation context and path into a trail. Both
//! the web and mobile shells render the same trail.

use crate::landing::LandingPages;
use serde::{Deserialize, Serialize};
use taskhub_access::{grant_for, EntityKind, Grant, Permission, Role};
use taskhub_navigation::{normalize_path, segments, NavigationContext};

/// One step of the trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Display label
    pub label: String,
    /// Link target
    pub href: String,
    /// Whether this is the page being shown
    pub is_current: bool,
}

impl Breadcrumb {
    fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            is_current: false,
        }
    }
}

/// Label of the dashboard root
pub const DASHBOARD_LABEL: &str = "Dashboard";

/// Pages that get their own trailing crumb
const SPECIAL_PAGES: [(&str, &str); 5] = [
    ("settings", "Settings"),
    ("users", "Users"),
    ("tasks", "Tasks"),
    ("sops", "SOPs"),
    ("reports", "Reports"),
];

/// Href of an entity detail page
#[must_use]
pub fn entity_href(kind: EntityKind, id: &str) -> String {
    let collection = match kind {
        EntityKind::System => "systems",
        EntityKind::Agency => "agencies",
        EntityKind::Client => "clients",
    };
    format!("/{collection}/{id}")
}

fn view_permission(kind: EntityKind) -> Permission {
    match kind {
        EntityKind::System => Permission::ViewSystem,
        EntityKind::Agency => Permission::ViewAgency,
        EntityKind::Client => Permission::ViewClient,
    }
}

/// Whether a context level belongs in the trail for `role`
fn shows_level(role: Role, kind: EntityKind) -> bool {
    let above_home = kind.depth() < role.home_level().depth();
    !(above_home && grant_for(role, view_permission(kind)) == Grant::Never)
}

/// Build the trail for a page
///
/// Returns an empty trail when it would hold the dashboard alone.
#[must_use]
pub fn breadcrumbs(
    role: Role,
    context: &NavigationContext,
    path: &str,
    landing: &LandingPages,
) -> Vec<Breadcrumb> {
    let path = normalize_path(path);
    let mut trail = vec![Breadcrumb::link(DASHBOARD_LABEL, landing.for_role(role))];

    for (kind, label) in context.levels() {
        if !shows_level(role, kind) {
            continue;
        }
        let href = entity_href(kind, &label.id);
        if trail.iter().any(|crumb| crumb.href == href) {
            continue;
        }
        trail.push(Breadcrumb::link(label.name.clone(), href));
    }

    let special = segments(&path)
        .next()
        .and_then(|first| SPECIAL_PAGES.iter().find(|(segment, _)| *segment == first));
    if let Some((segment, label)) = special {
        let href = format!("/{segment}");
        if !trail.iter().any(|crumb| crumb.href == href) {
            trail.push(Breadcrumb::link(*label, href));
        }
    }

    if trail.len() <= 1 {
        return Vec::new();
    }
    if let Some(last) = trail.last_mut() {
        last.is_current = true;
    }
    trail
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskhub_navigation::EntityLabel;

    fn full_context() -> NavigationContext {
        NavigationContext {
            current_system: Some(EntityLabel::new("S1", "North")),
            current_agency: Some(EntityLabel::new("A1", "Acme")),
            current_client: Some(EntityLabel::new("C1", "Globex")),
        }
    }

    fn labels(trail: &[Breadcrumb]) -> Vec<&str> {
        trail.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn client_user_on_tasks() {
        let trail = breadcrumbs(
            Role::ClientUser,
            &NavigationContext::empty(),
            "/tasks",
            &LandingPages::default(),
        );
        assert_eq!(
            trail,
            vec![
                Breadcrumb::link("Dashboard", "/dashboard"),
                Breadcrumb {
                    label: "Tasks".into(),
                    href: "/tasks".into(),
                    is_current: true,
                },
            ]
        );
    }

    #[test]
    fn dashboard_alone_renders_nothing() {
        let trail = breadcrumbs(
            Role::SystemAdmin,
            &NavigationContext::empty(),
            "/dashboard",
            &LandingPages::default(),
        );
        assert!(trail.is_empty());
    }

    #[test]
    fn system_admin_sees_whole_hierarchy() {
        let trail = breadcrumbs(
            Role::SystemAdmin,
            &full_context(),
            "/clients/C1",
            &LandingPages::default(),
        );
        assert_eq!(labels(&trail), vec!["Dashboard", "North", "Acme", "Globex"]);
        assert_eq!(trail[3].href, "/clients/C1");
        assert!(trail[3].is_current);
        assert!(!trail[2].is_current);
    }

    #[test]
    fn levels_above_home_hidden_when_not_viewable() {
        let trail = breadcrumbs(
            Role::ClientUser,
            &full_context(),
            "/sops",
            &LandingPages::default(),
        );
        assert_eq!(labels(&trail), vec!["Dashboard", "Globex", "SOPs"]);

        let trail = breadcrumbs(
            Role::AgencyAdmin,
            &full_context(),
            "/clients/C1",
            &LandingPages::default(),
        );
        assert_eq!(labels(&trail), vec!["Dashboard", "Acme", "Globex"]);
    }

    #[test]
    fn landing_page_as_root_href() {
        let landing = LandingPages::uniform("/home");
        let ctx = NavigationContext::empty();
        let trail = breadcrumbs(Role::ClientAdmin, &ctx, "/reports", &landing);
        assert_eq!(trail[0].href, "/home");
    }

    #[test]
    fn duplicate_special_page_skipped() {
        let landing = LandingPages::uniform("/tasks");
        let trail = breadcrumbs(Role::ClientUser, &NavigationContext::empty(), "/tasks", &landing);
        assert!(trail.is_empty());
    }
}
