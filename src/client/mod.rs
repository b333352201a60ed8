//! Resource client boundary.
//!
//! The discovery engine only talks to the remote repository through
//! [`ResourceClient`]. [`ApsClient`] is the HTTP implementation; tests plug in
//! in-memory fixtures. Transport concerns (auth header, timeouts, status
//! mapping) stay on this side of the trait.

mod aps;
mod wire;

pub use aps::ApsClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::*;

/// Errors raised at the client boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: access token missing, expired or lacking scope")]
    Unauthorized,

    #[error("Rate limited by remote API")]
    RateLimited,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Read access to the hub/project/folder hierarchy and derivative manifests.
///
/// Implementations must be shareable across tasks; every call may fail with
/// a [`ClientError`] and is never retried by the engine.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn list_hubs(&self) -> Result<Vec<HubRef>, ClientError>;

    async fn list_projects(&self, hub: &HubRef) -> Result<Vec<ProjectRef>, ClientError>;

    async fn list_top_folders(
        &self,
        hub: &HubRef,
        project: &ProjectRef,
    ) -> Result<Vec<FolderRef>, ClientError>;

    /// Direct children of a folder, in listing order.
    async fn list_children(&self, folder: &FolderRef) -> Result<Vec<FolderChild>, ClientError>;

    /// Latest version id of an item, `None` if it has no versions.
    async fn latest_version(&self, item: &ItemEntry) -> Result<Option<String>, ClientError>;

    async fn fetch_manifest(&self, derivative_id: &str) -> Result<Manifest, ClientError>;
}
