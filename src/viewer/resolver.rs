//! Manifest-based view resolution.
//!
//! The flat "list viewables" metadata does not reliably give GUIDs a viewer
//! can load directly; the manifest's role tags do. Viewables are the
//! `geometry` nodes whose role is `2d` or `3d`. Camera `view` nodes nested
//! under a geometry belong to it and are not separate viewables.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::ResourceClient;
use crate::discovery::WorkerPool;
use crate::error::{BranchFailure, DiscoveryError, FailureScope, Result};
use crate::models::*;

/// Views resolved for a batch of items, plus the items that could not be resolved.
#[derive(Debug, Default)]
pub struct ViewReport {
    pub views: Vec<ViewResult>,
    pub failures: Vec<BranchFailure>,
}

pub struct ManifestResolver<C> {
    client: Arc<C>,
}

impl<C> Clone for ManifestResolver<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: ResourceClient + 'static> ManifestResolver<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetch the raw manifest of a derivative.
    pub async fn fetch(&self, derivative_id: &str) -> Result<Manifest> {
        Ok(self.client.fetch_manifest(derivative_id).await?)
    }

    /// Resolve the 2D and 3D views of one item.
    pub async fn resolve(&self, item: &ItemRef) -> Result<ViewResult> {
        let manifest = self.fetch(&item.derivative_id).await?;
        let views = extract_views(&item.derivative_id, &manifest)?;
        debug!(item = %item.name, views = views.len(), "Resolved views");
        Ok(ViewResult {
            item: item.clone(),
            views,
        })
    }

    /// Resolve every item concurrently through `pool`.
    ///
    /// Failed items are reported in [`ViewReport::failures`]; the rest are
    /// returned in input order.
    pub async fn resolve_all(&self, items: &[ItemRef], pool: &WorkerPool) -> ViewReport {
        let handles: Vec<_> = items
            .iter()
            .cloned()
            .map(|item| {
                let resolver = self.clone();
                let worker = pool.clone();
                pool.submit(async move {
                    let result = worker.run(resolver.resolve(&item)).await;
                    (item, result)
                })
            })
            .collect();

        let mut report = ViewReport::default();
        for (handle, item) in handles.into_iter().zip(items) {
            match handle.await {
                Ok((_, Ok(view))) => report.views.push(view),
                Ok((item, Err(e))) => {
                    warn!(item = %item.name, error = %e, "View resolution failed");
                    report
                        .failures
                        .push(BranchFailure::new(FailureScope::Manifest, item.id, item.name, e));
                }
                Err(join_error) => report.failures.push(BranchFailure::new(
                    FailureScope::Manifest,
                    item.id.clone(),
                    item.name.clone(),
                    join_error.into(),
                )),
            }
        }
        report
    }
}

/// Check the processing status and collect viewables in depth-first order.
///
/// `Pending`/`InProgress` give [`DiscoveryError::NotReady`], `Failed` gives
/// [`DiscoveryError::ResolutionFailed`]. A complete manifest without 2D or 3D
/// geometry yields no views of that type, not an error.
pub fn extract_views(urn: &str, manifest: &Manifest) -> Result<Vec<Viewable>> {
    match manifest.status {
        ManifestStatus::Complete => {}
        ManifestStatus::Failed => {
            return Err(DiscoveryError::ResolutionFailed {
                urn: urn.to_string(),
                reason: failure_reason(manifest),
            })
        }
        status => {
            return Err(DiscoveryError::NotReady {
                urn: urn.to_string(),
                status,
                progress: manifest.progress.clone(),
            })
        }
    }

    let mut views = Vec::new();
    for derivative in &manifest.derivatives {
        collect_viewables(urn, derivative, &mut views)?;
    }
    Ok(views)
}

fn collect_viewables(urn: &str, node: &ManifestNode, out: &mut Vec<Viewable>) -> Result<()> {
    if node.kind == NodeKind::Geometry {
        if let Some(viewable_type) = node.viewable_type() {
            let guid = node.guid.clone().ok_or_else(|| {
                DiscoveryError::MalformedTree(format!(
                    "{} geometry '{}' in manifest of {} has no guid",
                    viewable_type.as_str(),
                    node.name.as_deref().unwrap_or("?"),
                    urn
                ))
            })?;
            out.push(Viewable {
                viewable_type,
                guid,
                name: node.name.clone(),
            });
        }
    }
    for child in &node.children {
        collect_viewables(urn, child, out)?;
    }
    Ok(())
}

fn failure_reason(manifest: &Manifest) -> String {
    match manifest.progress.as_deref() {
        Some(progress) => format!("translation failed ({})", progress),
        None => "translation failed".to_string(),
    }
}
