use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::item::ItemRef;
use super::manifest::ViewableType;

/// One loadable view of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewable {
    pub viewable_type: ViewableType,
    pub guid: String,
    pub name: Option<String>,
}

/// The views resolved for a single item, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewResult {
    pub item: ItemRef,
    pub views: Vec<Viewable>,
}

impl ViewResult {
    /// GUIDs of the given viewable type, in manifest order. Empty if the model has none.
    pub fn guids(&self, viewable_type: ViewableType) -> Vec<&str> {
        self.views
            .iter()
            .filter(|v| v.viewable_type == viewable_type)
            .map(|v| v.guid.as_str())
            .collect()
    }

    /// One viewer target per view, or a single default target when the model has none.
    pub fn viewer_targets(&self) -> Vec<ViewerTarget> {
        if self.views.is_empty() {
            return vec![ViewerTarget::new(&self.item.derivative_id, None)];
        }
        self.views
            .iter()
            .map(|v| ViewerTarget::new(&self.item.derivative_id, Some(v.guid.clone())))
            .collect()
    }
}

/// What a viewer needs besides its access token: the encoded document URN and
/// an optional view GUID. Without a GUID the viewer loads its default geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerTarget {
    pub urn: String,
    pub guid: Option<String>,
}

impl ViewerTarget {
    pub fn new(derivative_id: &str, guid: Option<String>) -> Self {
        Self {
            urn: encode_urn(derivative_id),
            guid,
        }
    }
}

/// URL-safe base64 without padding, the form derivative endpoints and viewers expect.
pub fn encode_urn(urn: &str) -> String {
    URL_SAFE_NO_PAD.encode(urn.as_bytes())
}
