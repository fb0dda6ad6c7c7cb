use serde::{Deserialize, Serialize};

use super::permissions::{Action, PermissionMap};
use super::role::{Role, RoleClass};

/// A signed-in console account, as returned by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub role: Role,
    /// The account-level permission table. This is the table access
    /// resolution reads; any table embedded in the role object is ignored.
    #[serde(default)]
    pub permissions: PermissionMap,
}

impl User {
    /// Whether this account may perform `action` on `resource`.
    pub fn permits(&self, resource: &str, action: &str) -> bool {
        match self.role.class() {
            RoleClass::Admin => true,
            RoleClass::Viewer if action == Action::View.as_str() => true,
            _ => self.table_lookup(resource, action),
        }
    }

    /// Resolve from the permission table: exact key first, then the
    /// plural/singular alias.
    fn table_lookup(&self, resource: &str, action: &str) -> bool {
        if self.permissions.allows(resource, action) {
            return true;
        }
        // Bare-name roles get no alias fallback: the exact key or nothing.
        if !self.role.is_detailed() {
            return false;
        }
        match resource.strip_suffix('s') {
            Some(singular) => self.permissions.allows(singular, action),
            None => self.permissions.allows(&format!("{resource}s"), action),
        }
    }
}

/// Resolve whether `user` may perform `action` on `resource`.
///
/// This is the single predicate every screen consults. It never fails: an
/// anonymous caller, an unknown resource, or an unknown action all resolve
/// to a denial.
pub fn has_permission(user: Option<&User>, resource: &str, action: &str) -> bool {
    match user {
        Some(user) => user.permits(resource, action),
        None => false,
    }
}
