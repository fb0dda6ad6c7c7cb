use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

/// Resource identifiers for the stock admin screens.
///
/// The permission tables are keyed by free-form strings so newly added
/// screens need no code change, but these are the names the seeded roles
/// use.
pub mod resources {
    pub const CANDIDATES: &str = "candidates";
    pub const VOTERS: &str = "voters";
    pub const POSITIONS: &str = "positions";
    pub const HOUSES: &str = "houses";
    pub const YEARS: &str = "years";
    pub const ROLES: &str = "roles";
    pub const RESULTS: &str = "results";
}

/// The stock actions a screen can gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Add,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Add, Action::Edit, Action::Delete];

    /// The wire name, as used for permission table keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The per-resource action flags, e.g. `{"view": true, "edit": false}`.
///
/// Actions are open-ended strings on the wire; a missing entry denies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionGrants(HashMap<String, bool>);

impl ActionGrants {
    /// Whether the given action is explicitly granted.
    pub fn allows(&self, action: &str) -> bool {
        self.0.get(action).copied().unwrap_or(false)
    }
}

impl Deref for ActionGrants {
    type Target = HashMap<String, bool>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ActionGrants {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A full permission table: resource name to action flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(HashMap<String, ActionGrants>);

impl PermissionMap {
    /// Whether the table grants `action` on exactly `resource`. Alias
    /// handling lives above this layer.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.0
            .get(resource)
            .map(|grants| grants.allows(action))
            .unwrap_or(false)
    }

    /// Grant `action` on `resource`, creating the resource row if needed.
    pub fn grant(&mut self, resource: &str, action: &str) {
        self.0
            .entry(resource.to_string())
            .or_default()
            .insert(action.to_string(), true);
    }
}

impl Deref for PermissionMap {
    type Target = HashMap<String, ActionGrants>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PermissionMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
