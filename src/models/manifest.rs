use serde::{Deserialize, Serialize};

/// A derivative manifest: processing status plus the tree of produced outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub urn: Option<String>,
    pub status: ManifestStatus,
    /// Free-form progress text, e.g. `complete` or `45% complete`.
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub derivatives: Vec<ManifestNode>,
}

/// Processing status of a derivative manifest.
///
/// `Pending → InProgress → {Complete, Failed}`. Only `Complete` manifests carry
/// usable view GUIDs; the platform reports completion as `success` and a
/// timed-out translation as `timeout`, which is treated as `Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManifestStatus {
    Pending,
    #[serde(alias = "in_progress")]
    InProgress,
    #[serde(alias = "success")]
    Complete,
    #[serde(alias = "timeout")]
    Failed,
}

impl ManifestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inprogress",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Still being processed; asking again later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl std::fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the derivative tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub children: Vec<ManifestNode>,
}

impl ManifestNode {
    /// The viewable type named by this node's role, if any.
    pub fn viewable_type(&self) -> Option<ViewableType> {
        self.role.as_deref().and_then(ViewableType::from_role)
    }
}

/// The `type` tag of a manifest node.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Design,
    Geometry,
    View,
    Resource,
    Folder,
    #[default]
    #[serde(other)]
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Geometry => "geometry",
            Self::View => "view",
            Self::Resource => "resource",
            Self::Folder => "folder",
            Self::Other => "other",
        }
    }
}

/// Whether a viewable renders as a sheet (2D) or a model (3D).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ViewableType {
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
}

impl ViewableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
        }
    }

    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "2d" => Some(Self::TwoD),
            "3d" => Some(Self::ThreeD),
            _ => None,
        }
    }
}
