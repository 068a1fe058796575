//! Role × permission matrix
//!
//! Flattened view of [`grant_for`] without entity scoping, used for
//! documentation output and exhaustive checks.

use crate::evaluator::{decide, grant_for, Grant};
use crate::permission::Permission;
use crate::principal::{EntityScope, Principal};
use crate::role::Role;
use serde::Serialize;

/// One cell of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    /// Permission
    pub permission: Permission,
    /// Table entry
    pub grant: Grant,
    /// Outcome when no entity is named
    pub granted: bool,
}

/// All cells for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    /// Role
    pub role: Role,
    /// Cells in [`Permission::ALL`] order
    pub cells: Vec<MatrixCell>,
}

/// Complete matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionMatrix {
    /// Rows in [`Role::ALL`] order
    pub rows: Vec<MatrixRow>,
}

impl PermissionMatrix {
    /// Build matrix for all roles
    #[must_use]
    pub fn for_roles() -> Self {
        Self::for_role_set(&Role::ALL)
    }

    /// Build matrix for selected roles
    #[must_use]
    pub fn for_role_set(roles: &[Role]) -> Self {
        let rows = roles
            .iter()
            .map(|&role| {
                let principal = Principal::new("matrix", role);
                let cells = Permission::ALL
                    .into_iter()
                    .map(|permission| MatrixCell {
                        permission,
                        grant: grant_for(role, permission),
                        granted: decide(&principal, permission, EntityScope::NONE).granted,
                    })
                    .collect();
                MatrixRow { role, cells }
            })
            .collect();
        Self { rows }
    }

    /// Lookup one outcome
    #[must_use]
    pub fn granted(&self, role: Role, permission: Permission) -> Option<bool> {
        self.rows
            .iter()
            .find(|r| r.role == role)?
            .cells
            .iter()
            .find(|c| c.permission == permission)
            .map(|c| c.granted)
    }

    /// Number of cells
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    /// Render as a fixed-width text table
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!("{:<16}", "permission");
        for row in &self.rows {
            out.push_str(&format!("{:>14}", row.role.as_str()));
        }
        out.push('\n');
        for (i, permission) in Permission::ALL.iter().enumerate() {
            out.push_str(&format!("{:<16}", permission.as_str()));
            for row in &self.rows {
                let mark = match row.cells.get(i).map(|c| c.grant) {
                    Some(Grant::Always) => "yes",
                    Some(Grant::ScopedTo(_)) => "scoped",
                    Some(Grant::Never) | None => "-",
                };
                out.push_str(&format!("{mark:>14}"));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_has_56_cells() {
        assert_eq!(PermissionMatrix::for_roles().cell_count(), 56);
    }

    #[test]
    fn matrix_lookup() {
        let m = PermissionMatrix::for_roles();
        assert_eq!(m.granted(Role::ClientUser, Permission::ManageTasks), Some(true));
        assert_eq!(m.granted(Role::ClientUser, Permission::ManageUsers), Some(false));
    }

    #[test]
    fn text_rendering_lists_every_permission() {
        let text = PermissionMatrix::for_roles().to_text();
        for p in Permission::ALL {
            assert!(text.contains(p.as_str()));
        }
        assert_eq!(text.lines().count(), 15);
    }
}
