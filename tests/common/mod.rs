//! In-memory resource client and fixture builders shared by the specs.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cad_discovery::client::{ClientError, ResourceClient};
use cad_discovery::models::*;

/// A fake repository. Every call sleeps briefly so concurrent calls overlap,
/// and the peak number of simultaneous calls is recorded.
#[derive(Default)]
pub struct FixtureClient {
    hubs: Vec<HubRef>,
    projects: HashMap<String, Vec<ProjectRef>>,
    top_folders: HashMap<String, Vec<FolderRef>>,
    children: HashMap<String, Vec<FolderChild>>,
    folder_project: HashMap<String, String>,
    versions: HashMap<String, Option<String>>,
    manifests: HashMap<String, Manifest>,
    failing: HashSet<String>,
    fail_hub_listing: bool,
    latency: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    version_lookups: Mutex<Vec<String>>,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(2),
            ..Default::default()
        }
    }

    pub fn hub(mut self, id: &str, name: &str) -> Self {
        self.hubs.push(HubRef {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.projects.entry(id.to_string()).or_default();
        self
    }

    pub fn project(mut self, hub_id: &str, id: &str, name: &str) -> Self {
        self.projects
            .entry(hub_id.to_string())
            .or_default()
            .push(ProjectRef {
                hub_id: hub_id.to_string(),
                id: id.to_string(),
                name: name.to_string(),
            });
        self.top_folders.entry(id.to_string()).or_default();
        self
    }

    pub fn top_folder(mut self, hub_id: &str, project_id: &str, id: &str, name: &str) -> Self {
        self.top_folders
            .entry(project_id.to_string())
            .or_default()
            .push(FolderRef {
                id: id.to_string(),
                project_id: project_id.to_string(),
                parent: ParentRef::Project {
                    hub_id: hub_id.to_string(),
                    project_id: project_id.to_string(),
                },
                name: name.to_string(),
            });
        self.folder_project
            .insert(id.to_string(), project_id.to_string());
        self.children.entry(id.to_string()).or_default();
        self
    }

    pub fn folder(mut self, parent_id: &str, id: &str, name: &str) -> Self {
        let project_id = self.project_of(parent_id);
        let folder = FolderRef {
            id: id.to_string(),
            project_id: project_id.clone(),
            parent: ParentRef::Folder {
                folder_id: parent_id.to_string(),
            },
            name: name.to_string(),
        };
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(FolderChild::Folder(folder));
        self.folder_project.insert(id.to_string(), project_id);
        self.children.entry(id.to_string()).or_default();
        self
    }

    /// Add an item whose listing carries its tip version `{id}?version=1`.
    pub fn item(self, folder_id: &str, id: &str, name: &str) -> Self {
        let tip = format!("{}?version=1", id);
        self.item_with_tip(folder_id, id, name, Some(tip))
    }

    pub fn item_with_tip(mut self, folder_id: &str, id: &str, name: &str, tip: Option<String>) -> Self {
        let entry = ItemEntry {
            id: id.to_string(),
            project_id: self.project_of(folder_id),
            folder_id: folder_id.to_string(),
            name: name.to_string(),
            tip_version: tip,
            last_modified: None,
        };
        self.children
            .entry(folder_id.to_string())
            .or_default()
            .push(FolderChild::Item(entry));
        self
    }

    pub fn other(mut self, folder_id: &str, id: &str, type_tag: &str) -> Self {
        self.children
            .entry(folder_id.to_string())
            .or_default()
            .push(FolderChild::Other {
                id: id.to_string(),
                type_tag: type_tag.to_string(),
            });
        self
    }

    /// Answer for the versions endpoint of an item.
    pub fn versions(mut self, item_id: &str, latest: Option<&str>) -> Self {
        self.versions
            .insert(item_id.to_string(), latest.map(String::from));
        self
    }

    pub fn manifest(mut self, urn: &str, manifest: Manifest) -> Self {
        self.manifests.insert(urn.to_string(), manifest);
        self
    }

    /// Make every call addressed to `id` (hub, project, folder, item or urn) fail.
    pub fn fail(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn fail_hub_listing(mut self) -> Self {
        self.fail_hub_listing = true;
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn version_lookups(&self) -> Vec<String> {
        self.version_lookups.lock().unwrap().clone()
    }

    pub fn folder_count(&self) -> usize {
        self.folder_project.len()
    }

    /// Look up a folder added to the fixture, top-level or nested.
    pub fn folder_ref(&self, id: &str) -> FolderRef {
        let top = self.top_folders.values().flatten().find(|f| f.id == id);
        let nested = self.children.values().flatten().find_map(|c| match c {
            FolderChild::Folder(f) if f.id == id => Some(f),
            _ => None,
        });
        top.or(nested)
            .cloned()
            .unwrap_or_else(|| panic!("no fixture folder {}", id))
    }

    fn project_of(&self, folder_id: &str) -> String {
        self.folder_project
            .get(folder_id)
            .cloned()
            .unwrap_or_else(|| panic!("fixture folder {} must be added before its children", folder_id))
    }

    async fn io(&self, id: &str) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(id) {
            return Err(ClientError::Server(format!("500: injected failure for {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceClient for FixtureClient {
    async fn list_hubs(&self) -> Result<Vec<HubRef>, ClientError> {
        self.io("hubs").await?;
        if self.fail_hub_listing {
            return Err(ClientError::Unauthorized);
        }
        Ok(self.hubs.clone())
    }

    async fn list_projects(&self, hub: &HubRef) -> Result<Vec<ProjectRef>, ClientError> {
        self.io(&hub.id).await?;
        self.projects
            .get(&hub.id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(hub.id.clone()))
    }

    async fn list_top_folders(
        &self,
        _hub: &HubRef,
        project: &ProjectRef,
    ) -> Result<Vec<FolderRef>, ClientError> {
        self.io(&project.id).await?;
        self.top_folders
            .get(&project.id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(project.id.clone()))
    }

    async fn list_children(&self, folder: &FolderRef) -> Result<Vec<FolderChild>, ClientError> {
        self.io(&folder.id).await?;
        self.children
            .get(&folder.id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(folder.id.clone()))
    }

    async fn latest_version(&self, item: &ItemEntry) -> Result<Option<String>, ClientError> {
        self.version_lookups.lock().unwrap().push(item.id.clone());
        self.io(&item.id).await?;
        Ok(self.versions.get(&item.id).cloned().flatten())
    }

    async fn fetch_manifest(&self, derivative_id: &str) -> Result<Manifest, ClientError> {
        self.io(derivative_id).await?;
        self.manifests
            .get(derivative_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(derivative_id.to_string()))
    }
}

/// A generated single-project tree: `breadth` subfolders per folder down to
/// `depth` levels below the top folder, each folder holding one CAD file and
/// one PDF. Returns the client and the ids of all CAD items.
pub fn generated_tree(depth: usize, breadth: usize) -> (FixtureClient, Vec<String>) {
    let mut client = FixtureClient::new()
        .hub("h1", "Hub One")
        .project("h1", "b.p1", "Project One")
        .top_folder("h1", "b.p1", "f", "Top");
    let mut expected = Vec::new();
    let mut level = vec!["f".to_string()];

    for d in 0..=depth {
        let mut next = Vec::new();
        for folder in &level {
            let item_id = format!("{}-model", folder);
            client = client
                .item(folder, &item_id, &format!("{}.dwg", item_id))
                .item(folder, &format!("{}-doc", folder), "notes.pdf");
            expected.push(item_id);
            if d < depth {
                for b in 0..breadth {
                    let sub = format!("{}.{}", folder, b);
                    client = client.folder(folder, &sub, &format!("Folder {}", sub));
                    next.push(sub);
                }
            }
        }
        level = next;
    }
    (client, expected)
}

pub fn geometry(role: &str, guid: &str, name: &str, children: Vec<ManifestNode>) -> ManifestNode {
    ManifestNode {
        kind: NodeKind::Geometry,
        role: Some(role.to_string()),
        guid: Some(guid.to_string()),
        name: Some(name.to_string()),
        status: Some("success".to_string()),
        children,
    }
}

pub fn node(kind: NodeKind, role: Option<&str>, guid: &str, children: Vec<ManifestNode>) -> ManifestNode {
    ManifestNode {
        kind,
        role: role.map(String::from),
        guid: Some(guid.to_string()),
        name: None,
        status: None,
        children,
    }
}

/// A manifest with one SVF derivative containing `nodes`.
pub fn manifest(status: ManifestStatus, nodes: Vec<ManifestNode>) -> Manifest {
    Manifest {
        urn: None,
        status,
        progress: Some(match status {
            ManifestStatus::Complete => "complete".to_string(),
            _ => "45% complete".to_string(),
        }),
        derivatives: vec![ManifestNode {
            kind: NodeKind::Other,
            role: None,
            guid: None,
            name: Some("svf".to_string()),
            status: Some("success".to_string()),
            children: nodes,
        }],
    }
}

pub fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

pub fn item_ids(items: &[ItemRef]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}
