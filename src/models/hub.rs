use serde::{Deserialize, Serialize};

/// An account or organization container in the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubRef {
    pub id: String,
    pub name: String,
}

impl HubRef {
    /// Whether a user-supplied filter selects this hub (by id or display name).
    pub fn matches(&self, filter: &str) -> bool {
        self.id == filter || self.name == filter
    }
}

/// A project inside a hub.
///
/// Projects sit between hubs and top folders. Project ids are already
/// prefixed by the platform (e.g. `b.`) and are used verbatim in data API paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub hub_id: String,
    pub id: String,
    pub name: String,
}
