use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A folder at any depth of a project.
///
/// The owning project id travels with every folder because the contents
/// endpoint is addressed by `(project, folder)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub id: String,
    pub project_id: String,
    pub parent: ParentRef,
    pub name: String,
}

/// What a folder hangs off: a project (top folders) or another folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParentRef {
    Project { hub_id: String, project_id: String },
    Folder { folder_id: String },
}

/// A raw item entry from a folder listing, before CAD classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: String,
    pub project_id: String,
    pub folder_id: String,
    pub name: String,
    /// Latest version id when the listing includes the `tip` relationship.
    pub tip_version: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One child of a folder listing, classified by the remote type tag.
///
/// - `folders` → [`FolderChild::Folder`]
/// - `items` → [`FolderChild::Item`]
/// - anything else → [`FolderChild::Other`], ignored by traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderChild {
    Folder(FolderRef),
    Item(ItemEntry),
    Other { id: String, type_tag: String },
}
