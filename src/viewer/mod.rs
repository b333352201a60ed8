//! View identifiers for the external viewer.

mod resolver;
pub mod tree_render;

pub use resolver::{extract_views, ManifestResolver, ViewReport};
