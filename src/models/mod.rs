//! Domain models for cad-discovery.
//!
//! # Core Concepts
//!
//! ## Remote Hierarchy
//!
//! - [`HubRef`]: Top-level account container. Discovery can be narrowed to a subset of hubs.
//! - [`ProjectRef`]: A project inside a hub; owns a set of top folders.
//! - [`FolderRef`]: A folder at any depth. Folders nest arbitrarily.
//! - [`FolderChild`]: One entry of a folder listing, classified by its type tag.
//!
//! ## Discovery Output
//!
//! - [`ItemRef`]: A CAD file found during traversal, with the derivative URN of its latest version.
//! - [`ViewResult`]: The 2D/3D view GUIDs resolved for one item from its [`Manifest`].
//!
//! Everything here is immutable once produced; nothing is persisted.

mod folder;
mod hub;
mod item;
mod manifest;
mod view;

pub use folder::*;
pub use hub::*;
pub use item::*;
pub use manifest::*;
pub use view::*;
