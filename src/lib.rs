//! cad-discovery - find CAD files in a cloud model repository and resolve
//! the view handles needed to render them.
//!
//! The repository is a tree: hubs → projects → top folders → folders → items.
//! [`discovery::HierarchyWalker`] walks it with bounded parallelism and
//! returns every CAD item; [`viewer::ManifestResolver`] turns an item's
//! derivative manifest into its 2D and 3D view GUIDs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cad_discovery::client::ApsClient;
//! use cad_discovery::config::Config;
//! use cad_discovery::discovery::HierarchyWalker;
//! use cad_discovery::viewer::ManifestResolver;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let client = Arc::new(ApsClient::from_config(&config)?);
//! let walker = HierarchyWalker::new(Arc::clone(&client), &config);
//!
//! let discovery = walker.discover(&[]).await?;
//! let report = ManifestResolver::new(client)
//!     .resolve_all(&discovery.items, walker.pool())
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod models;
pub mod report;
pub mod viewer;
