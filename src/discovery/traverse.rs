//! Recursive folder traversal.
//!
//! One routine serves both modes. With a [`WorkerPool`] every subfolder visit
//! is submitted as its own task and collected at a join point after the
//! listing has been walked; without one, subfolders are visited inline before
//! moving to the next sibling. Latest-version lookups for items listed
//! without a tip are queued the same way. Either way the result keeps
//! listing order:
//!
//! ```text
//! F: [a.dwg, G/, c.ipt]      G: [b.step]
//! traverse(F) -> [a.dwg, b.step, c.ipt]
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, trace, warn};

use super::pool::{run_on, WorkerPool};
use crate::client::ResourceClient;
use crate::config::DEFAULT_CAD_EXTENSIONS;
use crate::error::{BranchFailure, DiscoveryError, FailureScope, Result};
use crate::models::*;

/// Ordered CAD items found under one folder, plus failures from its subtree.
#[derive(Debug, Default)]
pub struct TraversalResult {
    pub items: Vec<ItemRef>,
    pub failures: Vec<BranchFailure>,
}

impl TraversalResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.failures.is_empty()
    }

    /// Append a child subtree's result after what has been collected so far.
    fn absorb(&mut self, other: TraversalResult) {
        self.items.extend(other.items);
        self.failures.extend(other.failures);
    }
}

/// Decides which item names are CAD files, by extension.
#[derive(Debug, Clone)]
pub struct CadClassifier {
    extensions: Vec<String>,
}

impl CadClassifier {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_cad(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

impl Default for CadClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAD_EXTENSIONS)
    }
}

pub type TraversalFuture = Pin<Box<dyn Future<Output = Result<TraversalResult>> + Send + 'static>>;

/// Work that is either finished (inline) or still running on the pool.
enum Pending<T> {
    Done(T),
    Queued(JoinHandle<T>),
}

impl<T> Pending<T> {
    async fn collect(self) -> std::result::Result<T, JoinError> {
        match self {
            Self::Done(value) => Ok(value),
            Self::Queued(handle) => handle.await,
        }
    }
}

type ItemOutcome = std::result::Result<Option<ItemRef>, BranchFailure>;

/// One listing entry's contribution, kept in listing order until the join point.
enum Slot {
    Item {
        id: String,
        name: String,
        pending: Pending<ItemOutcome>,
    },
    Folder(FolderRef, Pending<Result<TraversalResult>>),
}

pub struct FolderTraverser<C> {
    client: Arc<C>,
    classifier: Arc<CadClassifier>,
}

impl<C> Clone for FolderTraverser<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<C: ResourceClient + 'static> FolderTraverser<C> {
    pub fn new(client: Arc<C>, classifier: CadClassifier) -> Self {
        Self {
            client,
            classifier: Arc::new(classifier),
        }
    }

    /// Visit `folder` and everything below it.
    ///
    /// Fails only if `folder` itself cannot be listed. Failures further down
    /// are recorded in the result and do not stop sibling branches.
    pub fn traverse(&self, folder: FolderRef, pool: Option<WorkerPool>) -> TraversalFuture {
        let traverser = self.clone();
        Box::pin(async move { traverser.visit(folder, pool).await })
    }

    async fn visit(self, folder: FolderRef, pool: Option<WorkerPool>) -> Result<TraversalResult> {
        debug!(folder_id = %folder.id, folder = %folder.name, "Listing folder");
        let children = run_on(pool.as_ref(), self.client.list_children(&folder)).await?;

        let mut slots = Vec::with_capacity(children.len());
        for child in children {
            match child {
                FolderChild::Item(entry) => {
                    if !self.classifier.is_cad(&entry.name) {
                        trace!(item = %entry.name, "Skipping non-CAD item");
                        continue;
                    }
                    let (id, name) = (entry.id.clone(), entry.name.clone());
                    let pending = match &pool {
                        // Only a version lookup needs the network; queue it like a subfolder.
                        Some(pool) if entry.tip_version.is_none() => {
                            let traverser = self.clone();
                            let worker = pool.clone();
                            Pending::Queued(pool.submit(async move {
                                traverser.resolve_item(entry, Some(&worker)).await
                            }))
                        }
                        _ => Pending::Done(self.resolve_item(entry, pool.as_ref()).await),
                    };
                    slots.push(Slot::Item { id, name, pending });
                }
                FolderChild::Folder(sub) => {
                    let pending = match &pool {
                        Some(pool) => Pending::Queued(
                            pool.submit(self.traverse(sub.clone(), Some(pool.clone()))),
                        ),
                        None => Pending::Done(self.traverse(sub.clone(), None).await),
                    };
                    slots.push(Slot::Folder(sub, pending));
                }
                FolderChild::Other { id, type_tag } => {
                    trace!(id = %id, type_tag = %type_tag, "Ignoring unknown child type");
                }
            }
        }

        let mut result = TraversalResult::default();
        for slot in slots {
            match slot {
                Slot::Item { id, name, pending } => match pending.collect().await {
                    Ok(Ok(Some(item))) => result.items.push(item),
                    Ok(Ok(None)) => {}
                    Ok(Err(failure)) => result.failures.push(failure),
                    Err(join_error) => result.failures.push(BranchFailure::new(
                        FailureScope::Item,
                        id,
                        name,
                        join_error.into(),
                    )),
                },
                Slot::Folder(sub, pending) => match pending
                    .collect()
                    .await
                    .map_err(DiscoveryError::from)
                    .and_then(|r| r)
                {
                    Ok(sub_result) => result.absorb(sub_result),
                    Err(e) => {
                        warn!(folder_id = %sub.id, folder = %sub.name, error = %e, "Folder traversal failed");
                        result
                            .failures
                            .push(BranchFailure::new(FailureScope::Folder, sub.id, sub.name, e));
                    }
                },
            }
        }

        debug!(
            folder_id = %folder.id,
            items = result.items.len(),
            failures = result.failures.len(),
            "Folder done"
        );
        Ok(result)
    }

    /// Turn a CAD listing entry into an [`ItemRef`], looking up its latest
    /// version when the listing did not carry one. `Ok(None)` means the item
    /// has no versions yet.
    async fn resolve_item(
        &self,
        entry: ItemEntry,
        pool: Option<&WorkerPool>,
    ) -> ItemOutcome {
        let derivative_id = match entry.tip_version.clone() {
            Some(version) => Some(version),
            None => match run_on(pool, self.client.latest_version(&entry)).await {
                Ok(version) => version,
                Err(e) => {
                    warn!(item_id = %entry.id, item = %entry.name, error = %e, "Version lookup failed");
                    return Err(BranchFailure::new(
                        FailureScope::Item,
                        entry.id,
                        entry.name,
                        e.into(),
                    ));
                }
            },
        };

        let Some(derivative_id) = derivative_id else {
            warn!(item_id = %entry.id, item = %entry.name, "CAD item has no versions, skipping");
            return Ok(None);
        };

        Ok(Some(ItemRef {
            id: entry.id,
            name: entry.name,
            is_cad: true,
            derivative_id,
            project_id: entry.project_id,
            folder_id: entry.folder_id,
            last_modified: entry.last_modified,
        }))
    }
}
