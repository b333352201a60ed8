//! Hub → project → top folder enumeration.
//!
//! The walker lists hubs, then each selected hub's projects and their top
//! folders, and submits one traversal per top folder to the shared pool.
//! Finished branches are sent over a channel and merged by a single consumer
//! in completion order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::aggregate::{Aggregator, Discovery};
use super::pool::WorkerPool;
use super::traverse::{CadClassifier, FolderTraverser, TraversalFuture, TraversalResult};
use crate::client::ResourceClient;
use crate::config::Config;
use crate::error::{BranchFailure, DiscoveryError, FailureScope, Result};
use crate::models::*;

pub struct HierarchyWalker<C> {
    client: Arc<C>,
    traverser: FolderTraverser<C>,
    pool: WorkerPool,
    fan_out_subfolders: bool,
}

impl<C: ResourceClient + 'static> HierarchyWalker<C> {
    /// Create a walker with a fresh pool sized from `config`.
    pub fn new(client: Arc<C>, config: &Config) -> Self {
        Self::with_pool(
            client,
            CadClassifier::new(&config.cad_extensions),
            WorkerPool::new(config.workers),
            config.fan_out_subfolders,
        )
    }

    pub fn with_pool(
        client: Arc<C>,
        classifier: CadClassifier,
        pool: WorkerPool,
        fan_out_subfolders: bool,
    ) -> Self {
        Self {
            traverser: FolderTraverser::new(Arc::clone(&client), classifier),
            client,
            pool,
            fan_out_subfolders,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn traverser(&self) -> &FolderTraverser<C> {
        &self.traverser
    }

    /// List hubs and keep those selected by `filters` (id or name).
    ///
    /// No filters selects every hub. A filter matching nothing is an error,
    /// as is failing to list hubs at all.
    pub async fn select_hubs(&self, filters: &[String]) -> Result<Vec<HubRef>> {
        let hubs = self.pool.run(self.client.list_hubs()).await?;
        if filters.is_empty() {
            return Ok(hubs);
        }
        if let Some(missing) = filters
            .iter()
            .find(|f| !hubs.iter().any(|h| h.matches(f)))
        {
            return Err(DiscoveryError::HubNotFound(missing.clone()));
        }
        Ok(hubs
            .into_iter()
            .filter(|h| filters.iter().any(|f| h.matches(f)))
            .collect())
    }

    /// Discover every CAD item below the selected hubs.
    ///
    /// Returns `Err` only when hubs cannot be listed or a filter matches no
    /// hub. Project, folder and item failures are reported in
    /// [`Discovery::failures`] and never cancel other branches.
    pub async fn discover(&self, filters: &[String]) -> Result<Discovery> {
        let hubs = self.select_hubs(filters).await?;
        info!(hubs = hubs.len(), workers = self.pool.size(), "Starting discovery");

        let (tx, mut rx) = mpsc::unbounded_channel::<(FolderRef, Result<TraversalResult>)>();
        let mut aggregator = Aggregator::new();
        let mut submitted = 0usize;

        for hub in &hubs {
            let projects = match self.pool.run(self.client.list_projects(hub)).await {
                Ok(projects) => projects,
                Err(e) => {
                    warn!(hub_id = %hub.id, hub = %hub.name, error = %e, "Could not list projects");
                    aggregator.record_failure(BranchFailure::new(
                        FailureScope::Hub,
                        hub.id.clone(),
                        hub.name.clone(),
                        e.into(),
                    ));
                    continue;
                }
            };

            for project in &projects {
                let folders = match self
                    .pool
                    .run(self.client.list_top_folders(hub, project))
                    .await
                {
                    Ok(folders) => folders,
                    Err(e) => {
                        warn!(project_id = %project.id, project = %project.name, error = %e, "Could not list top folders");
                        aggregator.record_failure(BranchFailure::new(
                            FailureScope::Project,
                            project.id.clone(),
                            project.name.clone(),
                            e.into(),
                        ));
                        continue;
                    }
                };

                debug!(project = %project.name, top_folders = folders.len(), "Submitting top folders");
                for folder in folders {
                    let branch = self.submit_branch(folder.clone());
                    let tx = tx.clone();
                    self.pool.submit(async move {
                        let outcome = branch.await.map_err(DiscoveryError::from).and_then(|r| r);
                        // The receiver lives until every sender is dropped.
                        let _ = tx.send((folder, outcome));
                    });
                    submitted += 1;
                }
            }
        }
        drop(tx);

        while let Some((folder, outcome)) = rx.recv().await {
            match outcome {
                Ok(result) => {
                    let added = aggregator.merge(result);
                    debug!(folder = %folder.name, added, total = aggregator.len(), "Merged branch");
                }
                Err(e) => {
                    warn!(folder_id = %folder.id, folder = %folder.name, error = %e, "Top folder traversal failed");
                    aggregator.record_failure(BranchFailure::new(
                        FailureScope::Folder,
                        folder.id,
                        folder.name,
                        e,
                    ));
                }
            }
        }

        let discovery = aggregator.finish();
        info!(
            branches = submitted,
            items = discovery.items.len(),
            failures = discovery.failures.len(),
            "Discovery finished"
        );
        Ok(discovery)
    }

    /// Start one top folder's traversal on the pool.
    ///
    /// With subfolder fan-out the branch spreads across the pool; without it
    /// the whole branch runs inline while holding a single worker.
    fn submit_branch(&self, folder: FolderRef) -> tokio::task::JoinHandle<Result<TraversalResult>> {
        let branch: TraversalFuture = if self.fan_out_subfolders {
            self.traverser.traverse(folder, Some(self.pool.clone()))
        } else {
            let pool = self.pool.clone();
            let inline = self.traverser.traverse(folder, None);
            Box::pin(async move { pool.run(inline).await })
        };
        self.pool.submit(branch)
    }
}
