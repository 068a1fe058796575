//! Exhaustive role × permission outcomes
//!
//! Pins all 56 outcomes of the evaluator when no entity is named, plus the
//! entity-scoped rules for each role.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use taskhub_access::{
    EntityKind, EntityScope, MemoryAuditSink, Permission, PermissionEvaluator, Principal, Role,
};

const T: bool = true;
const F: bool = false;

/// Expected outcomes in `Permission::ALL` order:
/// view_system, manage_system, view_agency, manage_agency, view_client,
/// manage_client, view_tasks, manage_tasks, view_users, manage_users,
/// view_sops, manage_sops, view_reports, manage_settings
const EXPECTED: [(Role, [bool; 14]); 4] = [
    (Role::SystemAdmin, [T, T, T, T, T, T, T, T, T, T, T, T, T, T]),
    (Role::AgencyAdmin, [F, F, T, T, T, T, T, T, T, T, T, T, T, T]),
    (Role::ClientAdmin, [F, F, F, F, T, T, T, T, T, T, T, F, T, T]),
    (Role::ClientUser, [F, F, F, F, T, F, T, T, F, F, T, F, T, F]),
];

fn principal(role: Role) -> Principal {
    Principal::new(format!("user-{role}"), role)
        .with_system("S1")
        .with_agency("A1")
        .with_client("C1")
}

#[test]
fn all_56_outcomes_without_entity() {
    let evaluator = PermissionEvaluator::new(Arc::new(MemoryAuditSink::default()));

    let mut checked = 0;
    for (role, row) in EXPECTED {
        let p = principal(role);
        let actual: Vec<bool> = Permission::ALL
            .iter()
            .map(|&perm| evaluator.evaluate(&p, perm, EntityScope::NONE).granted)
            .collect();
        assert_eq!(actual, row.to_vec(), "role {role}");
        checked += actual.len();
    }
    assert_eq!(checked, 56);
}

#[test]
fn no_role_denies_everything() {
    let evaluator = PermissionEvaluator::default();
    let p = Principal::without_role("ghost").with_system("S1");
    for perm in Permission::ALL {
        let d = evaluator.evaluate(&p, perm, EntityScope::id("S1"));
        assert!(!d.granted);
        assert_eq!(d.reason, "no role");
    }
}

#[test]
fn system_admin_view_system_iff_home_system() {
    let evaluator = PermissionEvaluator::default();
    let p = principal(Role::SystemAdmin);

    assert!(evaluator.is_granted(&p, Permission::ViewSystem, EntityScope::id("S1")));
    assert!(!evaluator.is_granted(&p, Permission::ViewSystem, EntityScope::id("S2")));
    assert!(evaluator.is_granted(
        &p,
        Permission::ViewSystem,
        EntityScope::new("S1", EntityKind::System)
    ));
}

#[test]
fn manage_permissions_for_client_user() {
    let evaluator = PermissionEvaluator::default();
    let p = principal(Role::ClientUser);
    let granted: Vec<_> = Permission::ALL
        .into_iter()
        .filter(|perm| perm.is_manage())
        .filter(|&perm| evaluator.is_granted(&p, perm, EntityScope::NONE))
        .collect();
    assert_eq!(granted, vec![Permission::ManageTasks]);
}

fn any_role() -> impl Strategy<Value = Option<Role>> {
    prop_oneof![
        Just(None),
        Just(Some(Role::SystemAdmin)),
        Just(Some(Role::AgencyAdmin)),
        Just(Some(Role::ClientAdmin)),
        Just(Some(Role::ClientUser)),
    ]
}

fn any_permission() -> impl Strategy<Value = Permission> {
    (0..Permission::ALL.len()).prop_map(|i| Permission::ALL[i])
}

fn any_kind() -> impl Strategy<Value = Option<EntityKind>> {
    prop_oneof![
        Just(None),
        Just(Some(EntityKind::System)),
        Just(Some(EntityKind::Agency)),
        Just(Some(EntityKind::Client)),
    ]
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(
        role in any_role(),
        perm in any_permission(),
        id in proptest::option::of("[SAC][0-9]"),
        kind in any_kind(),
    ) {
        let evaluator = PermissionEvaluator::new(Arc::new(MemoryAuditSink::new(8)));
        let mut p = principal(Role::ClientUser);
        p.role = role;
        let scope = EntityScope { id: id.as_deref(), kind };

        let first = evaluator.evaluate(&p, perm, scope);
        let second = evaluator.evaluate(&p, perm, scope);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn agency_admin_never_views_system(id in proptest::option::of("[A-Z0-9]{1,6}")) {
        let evaluator = PermissionEvaluator::default();
        let p = principal(Role::AgencyAdmin);
        let scope = EntityScope {
            id: id.as_deref(),
            kind: None,
        };
        prop_assert!(!evaluator.is_granted(&p, Permission::ViewSystem, scope));
    }
}
