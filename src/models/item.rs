use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A CAD file discovered during traversal.
///
/// `derivative_id` is the latest version URN; it is the handle used to fetch
/// the item's derivative manifest. Two refs are the same item iff their `id`s match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub name: String,
    pub is_cad: bool,
    pub derivative_id: String,
    pub project_id: String,
    pub folder_id: String,
    pub last_modified: Option<DateTime<Utc>>,
}
