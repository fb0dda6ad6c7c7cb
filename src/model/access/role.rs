use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::permissions::PermissionMap;

/// Role name with full access to every resource and action.
pub const ADMIN_ROLE: &str = "admin";
/// Role name with unconditional read access.
pub const VIEWER_ROLE: &str = "viewer";

/// A user's role as served by the session endpoint: either a bare name or a
/// full role object.
///
/// With the untagged representation, both `"admin"` and
/// `{"name": "Editor", "permissions": {...}}` deserialize directly to this
/// type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Role {
    /// A bare role name.
    Name(String),
    /// A role object managed through the role screens.
    Detailed(RoleDetails),
}

/// The structured role form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetails {
    #[serde(default)]
    pub name: String,
    /// Embedded table kept for wire fidelity. Access resolution reads the
    /// account-level table, never this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionMap>,
}

/// Privilege classes with special-cased handling in the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    /// Allowed everything; no permission table is consulted.
    Admin,
    /// Allowed `view` everywhere; other actions resolve from the table.
    Viewer,
    /// Resolved purely from the permission table.
    Custom,
}

impl Role {
    /// The raw role name.
    pub fn name(&self) -> &str {
        match self {
            Role::Name(name) => name,
            Role::Detailed(details) => &details.name,
        }
    }

    /// The role name in canonical (lowercase) form. Every comparison against
    /// a well-known name goes through this.
    pub fn normalized(&self) -> String {
        self.name().to_lowercase()
    }

    /// Classify against the well-known role names.
    pub fn class(&self) -> RoleClass {
        match self.normalized().as_str() {
            ADMIN_ROLE => RoleClass::Admin,
            VIEWER_ROLE => RoleClass::Viewer,
            _ => RoleClass::Custom,
        }
    }

    /// Is this the structured form?
    pub fn is_detailed(&self) -> bool {
        matches!(self, Role::Detailed(_))
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
