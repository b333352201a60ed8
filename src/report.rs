//! JSON reports printed by the command line.
//!
//! Per-item and per-branch errors are part of a report, not a failed run.

use serde::Serialize;

use crate::error::{BranchFailure, FailureScope, Result};
use crate::models::{encode_urn, ItemRef, ViewResult, Viewable};

#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub scope: FailureScope,
    pub id: String,
    pub name: String,
    pub error: String,
    pub retryable: bool,
}

impl From<&BranchFailure> for FailureReport {
    fn from(failure: &BranchFailure) -> Self {
        Self {
            scope: failure.scope,
            id: failure.id.clone(),
            name: failure.name.clone(),
            error: failure.error.to_string(),
            retryable: failure.error.is_retryable(),
        }
    }
}

/// Output of `discover`.
#[derive(Debug, Serialize)]
pub struct DiscoveryReport<'a> {
    pub items: &'a [ItemRef],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<&'a [ViewResult]>,
    pub failures: Vec<FailureReport>,
}

/// Output of `views` for a single version URN.
#[derive(Debug, Serialize)]
pub struct SingleViewReport {
    pub urn: String,
    pub encoded_urn: String,
    pub views: Vec<Viewable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReport>,
}

impl SingleViewReport {
    pub fn new(urn: &str, outcome: Result<Vec<Viewable>>) -> Self {
        let (views, failure) = match outcome {
            Ok(views) => (views, None),
            Err(e) => {
                let failure = BranchFailure::new(FailureScope::Manifest, urn, urn, e);
                (Vec::new(), Some(FailureReport::from(&failure)))
            }
        };
        Self {
            urn: urn.to_string(),
            encoded_urn: encode_urn(urn),
            views,
            failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
