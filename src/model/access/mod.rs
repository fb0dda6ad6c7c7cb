//! Role/permission model and the access predicate every screen consults.

mod permissions;
mod role;
mod user;

pub use permissions::{resources, Action, ActionGrants, PermissionMap};
pub use role::{Role, RoleClass, RoleDetails, ADMIN_ROLE, VIEWER_ROLE};
pub use user::{has_permission, User};
