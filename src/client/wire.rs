//! JSON:API response shapes of the hub, project and data endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Document {
    #[serde(default)]
    pub data: Vec<Resource>,
    #[serde(default)]
    pub links: Option<Links>,
}

impl Document {
    pub fn next_page(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.next.as_ref())
            .map(|n| n.href.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub relationships: Relationships,
}

impl Resource {
    /// Display name, falling back to the plain name and then the id.
    pub fn display_name(&self) -> String {
        self.attributes
            .display_name
            .clone()
            .or_else(|| self.attributes.name.clone())
            .unwrap_or_else(|| self.id.clone())
    }

    pub fn tip_version(&self) -> Option<String> {
        self.relationships
            .tip
            .as_ref()
            .and_then(|t| t.data.as_ref())
            .map(|d| d.id.clone())
    }

    /// Timestamps that fail to parse are dropped rather than failing the listing.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.attributes
            .last_modified_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Attributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub last_modified_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Relationships {
    #[serde(default)]
    pub tip: Option<Relation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Relation {
    #[serde(default)]
    pub data: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceId {
    pub id: String,
}
