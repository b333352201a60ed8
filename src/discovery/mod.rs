//! Concurrent discovery of CAD items across the hub hierarchy.
//!
//! ```text
//! HierarchyWalker ── hubs → projects → top folders
//!        │ submit (one task per top folder)
//!        ▼
//!   WorkerPool ◄──── FolderTraverser ── subfolders re-submitted to the same pool
//!        │
//!        ▼ completion order
//!   Aggregator ── de-duplicated items + per-branch failures
//! ```

mod aggregate;
mod pool;
mod traverse;
mod walker;

pub use aggregate::{merge_all, Aggregator, Discovery};
pub use pool::{run_on, WorkerPool};
pub use traverse::{CadClassifier, FolderTraverser, TraversalFuture, TraversalResult};
pub use walker::HierarchyWalker;
