//! Merge point for concurrently produced traversal results.

use std::collections::HashSet;

use tracing::debug;

use super::traverse::TraversalResult;
use crate::error::BranchFailure;
use crate::models::ItemRef;

/// The outcome of a discovery run: every CAD item found, and every branch
/// that could not be walked. A non-empty `failures` means the item list is partial.
#[derive(Debug, Default)]
pub struct Discovery {
    pub items: Vec<ItemRef>,
    pub failures: Vec<BranchFailure>,
}

impl Discovery {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Accumulates branch results into one collection, de-duplicated by item id.
///
/// Items keep the order they arrive in: each branch's internal order is
/// preserved, branches land in whatever order they are merged.
#[derive(Debug, Default)]
pub struct Aggregator {
    items: Vec<ItemRef>,
    seen: HashSet<String>,
    failures: Vec<BranchFailure>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one branch. Returns how many previously unseen items it added.
    pub fn merge(&mut self, result: TraversalResult) -> usize {
        let before = self.items.len();
        for item in result.items {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            } else {
                debug!(item_id = %item.id, item = %item.name, "Dropping duplicate item");
            }
        }
        self.failures.extend(result.failures);
        self.items.len() - before
    }

    pub fn record_failure(&mut self, failure: BranchFailure) {
        self.failures.push(failure);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Discovery {
        Discovery {
            items: self.items,
            failures: self.failures,
        }
    }
}

/// Merge any number of results in iteration order.
pub fn merge_all<I>(results: I) -> Discovery
where
    I: IntoIterator<Item = TraversalResult>,
{
    let mut aggregator = Aggregator::new();
    for result in results {
        aggregator.merge(result);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DiscoveryError, FailureScope};

    fn item(id: &str) -> ItemRef {
        ItemRef {
            id: id.to_string(),
            name: format!("{}.dwg", id),
            is_cad: true,
            derivative_id: format!("urn:{}?version=1", id),
            project_id: "b.p".to_string(),
            folder_id: "f".to_string(),
            last_modified: None,
        }
    }

    fn result(ids: &[&str]) -> TraversalResult {
        TraversalResult {
            items: ids.iter().map(|id| item(id)).collect(),
            failures: vec![],
        }
    }

    fn ids(discovery: &Discovery) -> Vec<&str> {
        discovery.items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_shared_item_appears_once() {
        let discovery = merge_all(vec![result(&["a", "shared"]), result(&["shared", "b"])]);
        assert_eq!(ids(&discovery), vec!["a", "shared", "b"]);
    }

    #[test]
    fn test_preserves_branch_order() {
        let discovery = merge_all(vec![result(&["c", "a"]), result(&["z", "b", "y"])]);
        assert_eq!(ids(&discovery), vec!["c", "a", "z", "b", "y"]);
    }

    #[test]
    fn test_merge_reports_new_items() {
        let mut aggregator = Aggregator::new();
        assert_eq!(aggregator.merge(result(&["a", "b"])), 2);
        assert_eq!(aggregator.merge(result(&["b", "c"])), 1);
        assert_eq!(aggregator.len(), 3);
    }

    #[test]
    fn test_failures_are_kept() {
        let mut aggregator = Aggregator::new();
        aggregator.merge(TraversalResult {
            items: vec![item("a")],
            failures: vec![BranchFailure::new(
                FailureScope::Folder,
                "f9",
                "Broken",
                DiscoveryError::NotFound("f9".into()),
            )],
        });
        aggregator.record_failure(BranchFailure::new(
            FailureScope::Project,
            "b.p2",
            "Other",
            DiscoveryError::MalformedTree("bad".into()),
        ));

        let discovery = aggregator.finish();
        assert!(!discovery.is_complete());
        assert_eq!(discovery.items.len(), 1);
        assert_eq!(discovery.failures.len(), 2);
        assert_eq!(discovery.failures[0].scope, FailureScope::Folder);
    }

    #[test]
    fn test_empty_merge() {
        let discovery = merge_all(Vec::<TraversalResult>::new());
        assert!(discovery.items.is_empty());
        assert!(discovery.is_complete());
    }
}
