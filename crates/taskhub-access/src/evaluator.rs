//! Table-driven permission evaluator
//!
//! One authoritative role × permission table ([`grant_for`]) feeds every
//! consumer: route guard, menu projection and the CLI matrix. Evaluation is
//! pure; the only side effect is an audit record per call.

use crate::audit::{emit, AuditLevel, AuditRecord, SharedAuditSink, TracingAuditSink};
use crate::permission::Permission;
use crate::principal::{EntityScope, Principal};
use crate::role::{EntityKind, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reason given when the principal has no role
pub const REASON_NO_ROLE: &str = "no role";

/// Reason given for a permission name outside the closed set
pub const REASON_UNKNOWN_PERMISSION: &str = "unknown permission";

/// Table entry for one (role, permission) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Always granted
    Always,
    /// Never granted
    Never,
    /// Granted; when an entity of this kind is named it must be the
    /// principal's home entity of that kind
    ScopedTo(EntityKind),
}

/// Role × permission table
///
/// Entity scoping not expressed here (a system admin looking at an agency,
/// an agency admin looking at a client) is left to the data layer.
#[must_use]
pub const fn grant_for(role: Role, permission: Permission) -> Grant {
    use Permission as P;

    match role {
        Role::SystemAdmin => Grant::ScopedTo(EntityKind::System),
        Role::AgencyAdmin => match permission {
            P::ViewSystem | P::ManageSystem => Grant::Never,
            P::ViewAgency | P::ManageAgency => Grant::ScopedTo(EntityKind::Agency),
            _ => Grant::Always,
        },
        Role::ClientAdmin => match permission {
            P::ViewSystem | P::ManageSystem | P::ViewAgency | P::ManageAgency | P::ManageSops => {
                Grant::Never
            }
            P::ViewClient | P::ManageClient => Grant::ScopedTo(EntityKind::Client),
            P::ViewTasks
            | P::ManageTasks
            | P::ViewUsers
            | P::ManageUsers
            | P::ViewSops
            | P::ViewReports
            | P::ManageSettings => Grant::Always,
        },
        Role::ClientUser => match permission {
            P::ViewClient => Grant::ScopedTo(EntityKind::Client),
            P::ViewTasks | P::ViewSops | P::ViewReports | P::ManageTasks => Grant::Always,
            _ => Grant::Never,
        },
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether access is granted
    pub granted: bool,
    /// Explanation
    pub reason: String,
}

impl Decision {
    /// Granted decision
    #[inline]
    #[must_use]
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            granted: true,
            reason: reason.into(),
        }
    }

    /// Denied decision
    #[inline]
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            granted: false,
            reason: reason.into(),
        }
    }
}

/// Permission evaluator
///
/// Cheap to clone; clones share the audit sink.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    audit: SharedAuditSink,
}

impl PermissionEvaluator {
    /// Create evaluator reporting to `audit`
    #[inline]
    #[must_use]
    pub fn new(audit: SharedAuditSink) -> Self {
        Self { audit }
    }

    /// Evaluate a permission for a principal
    ///
    /// # Arguments
    /// * `principal` - Signed-in user
    /// * `permission` - Permission being checked
    /// * `entity` - Optional entity the check is scoped to
    ///
    /// # Returns
    /// The decision with its reason. Never fails.
    pub fn evaluate(
        &self,
        principal: &Principal,
        permission: Permission,
        entity: EntityScope<'_>,
    ) -> Decision {
        let decision = decide(principal, permission, entity);
        self.report(principal, permission.as_str(), entity, &decision);
        decision
    }

    /// Evaluate a permission given by name
    ///
    /// Names outside the closed set are denied with
    /// [`REASON_UNKNOWN_PERMISSION`] regardless of role.
    pub fn evaluate_named(
        &self,
        principal: &Principal,
        permission: &str,
        entity: EntityScope<'_>,
    ) -> Decision {
        let decision = match permission.parse::<Permission>() {
            Ok(p) => decide(principal, p, entity),
            Err(_) if principal.role.is_none() => Decision::deny(REASON_NO_ROLE),
            Err(_) => Decision::deny(REASON_UNKNOWN_PERMISSION),
        };
        self.report(principal, permission, entity, &decision);
        decision
    }

    /// Shorthand for `evaluate(..).granted`
    #[inline]
    #[must_use]
    pub fn is_granted(
        &self,
        principal: &Principal,
        permission: Permission,
        entity: EntityScope<'_>,
    ) -> bool {
        self.evaluate(principal, permission, entity).granted
    }

    fn report(
        &self,
        principal: &Principal,
        permission: &str,
        entity: EntityScope<'_>,
        decision: &Decision,
    ) {
        tracing::trace!(
            user = %principal.user_id,
            permission,
            granted = decision.granted,
            reason = %decision.reason,
            "permission evaluated"
        );

        let (level, message) = if decision.granted {
            (AuditLevel::Debug, "permission granted")
        } else {
            (AuditLevel::Warn, "permission denied")
        };
        let record = AuditRecord::new(level, "permission", message).with_details(serde_json::json!({
            "user_id": principal.user_id,
            "role": principal.role.map(Role::as_str),
            "permission": permission,
            "entity_id": entity.id,
            "entity_type": entity.kind.map(EntityKind::as_str),
            "granted": decision.granted,
            "reason": decision.reason,
        }));
        emit(self.audit.as_ref(), record);
    }
}

impl Default for PermissionEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(TracingAuditSink))
    }
}

/// Pure decision function behind [`PermissionEvaluator::evaluate`]
#[must_use]
pub fn decide(principal: &Principal, permission: Permission, entity: EntityScope<'_>) -> Decision {
    let Some(role) = principal.role else {
        return Decision::deny(REASON_NO_ROLE);
    };

    match grant_for(role, permission) {
        Grant::Always => Decision::allow(format!("{role} may {permission}")),
        Grant::Never => Decision::deny(format!("{role} may not {permission}")),
        Grant::ScopedTo(kind) => {
            let effective = entity.kind.or_else(|| permission.level());
            match (entity.id, effective) {
                (Some(id), Some(named)) if named == kind => {
                    if principal.scope_id(kind) == Some(id) {
                        Decision::allow(format!("{kind} {id} is within {role} scope"))
                    } else {
                        Decision::deny(format!("{kind} {id} is outside {role} scope"))
                    }
                }
                _ => Decision::allow(format!("{role} may {permission}")),
            }
        }
    }
}
