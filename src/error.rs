//! Error types for the discovery engine.
//!
//! Fatal errors (hub listing, unknown hub filter) are returned as `Err`.
//! Everything that goes wrong inside one branch is wrapped in a
//! [`BranchFailure`] and reported next to the successful results.

use serde::Serialize;
use thiserror::Error;

use crate::client::ClientError;
use crate::models::ManifestStatus;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Network, auth or rate-limit failure from the resource client.
    #[error("Transport error: {0}")]
    Transport(#[source] ClientError),

    /// The remote returned a structure the engine could not interpret.
    #[error("Malformed response: {0}")]
    MalformedTree(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Derivative processing has not finished yet; retry later.
    #[error("Manifest for {urn} not ready (status: {status}{})", progress_suffix(.progress))]
    NotReady {
        urn: String,
        status: ManifestStatus,
        progress: Option<String>,
    },

    /// Derivative processing failed permanently for this item.
    #[error("Derivative processing failed for {urn}: {reason}")]
    ResolutionFailed { urn: String, reason: String },

    #[error("No hub matches '{0}'")]
    HubNotFound(String),

    /// A spawned traversal task panicked or was cancelled.
    #[error("Traversal task aborted: {0}")]
    TaskAborted(String),
}

fn progress_suffix(progress: &Option<String>) -> String {
    match progress {
        Some(p) => format!(", progress: {}", p),
        None => String::new(),
    }
}

impl From<ClientError> for DiscoveryError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Malformed(msg) => Self::MalformedTree(msg),
            ClientError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Transport(other),
        }
    }
}

impl From<tokio::task::JoinError> for DiscoveryError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskAborted(err.to_string())
    }
}

impl DiscoveryError {
    /// Whether the same call may succeed if repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotReady { .. })
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Which part of the walk a failure belongs to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureScope {
    Hub,
    Project,
    Folder,
    Item,
    Manifest,
}

/// A failure confined to one branch of the walk or one item.
#[derive(Debug)]
pub struct BranchFailure {
    pub scope: FailureScope,
    pub id: String,
    pub name: String,
    pub error: DiscoveryError,
}

impl BranchFailure {
    pub fn new(
        scope: FailureScope,
        id: impl Into<String>,
        name: impl Into<String>,
        error: DiscoveryError,
    ) -> Self {
        Self {
            scope,
            id: id.into(),
            name: name.into(),
            error,
        }
    }
}
