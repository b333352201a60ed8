//! HTTP client for the hub, data and model derivative REST APIs.
//!
//! Configuration comes from [`Config`]:
//! - `base_url` - API host (default: `https://developer.api.autodesk.com`)
//! - `access_token` - Bearer token; obtaining and refreshing it is the caller's job

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::wire::{Document, Resource};
use super::{ClientError, ResourceClient};
use crate::config::Config;
use crate::models::*;

/// HTTP client for the remote model repository.
#[derive(Debug, Clone)]
pub struct ApsClient {
    base_url: Url,
    access_token: String,
    client: Client,
}

impl ApsClient {
    /// Create from loaded configuration. Fails if no access token is configured.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let token = config
            .access_token
            .clone()
            .ok_or(ClientError::Unauthorized)?;
        Self::new(&config.base_url, token, config.request_timeout)
    }

    /// Create with explicit configuration.
    pub fn new(
        base_url: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            access_token: access_token.into(),
            client,
        })
    }

    /// Build an endpoint URL; each segment is percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a URL and decode its JSON body, converting HTTP errors to ClientError.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))
        } else {
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
                StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    /// GET every page of a JSON:API collection, following `links.next.href`.
    ///
    /// A next link pointing back at an already fetched page is malformed.
    async fn get_all_pages(&self, first: Url) -> Result<Vec<Resource>, ClientError> {
        let mut resources = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first);
        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                return Err(ClientError::Malformed(format!(
                    "pagination loops back to {}",
                    url
                )));
            }
            let page: Document = self.get_json(url).await?;
            if let Some(href) = page.next_page() {
                let next_url = Url::parse(href)
                    .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", href, e)))?;
                next = Some(next_url);
            }
            resources.extend(page.data);
        }
        Ok(resources)
    }
}

#[async_trait]
impl ResourceClient for ApsClient {
    async fn list_hubs(&self) -> Result<Vec<HubRef>, ClientError> {
        let url = self.endpoint(&["project", "v1", "hubs"])?;
        let hubs = self
            .get_all_pages(url)
            .await?
            .into_iter()
            .map(|r| HubRef {
                name: r.display_name(),
                id: r.id,
            })
            .collect();
        Ok(hubs)
    }

    async fn list_projects(&self, hub: &HubRef) -> Result<Vec<ProjectRef>, ClientError> {
        let url = self.endpoint(&["project", "v1", "hubs", &hub.id, "projects"])?;
        let projects = self
            .get_all_pages(url)
            .await?
            .into_iter()
            .map(|r| ProjectRef {
                hub_id: hub.id.clone(),
                name: r.display_name(),
                id: r.id,
            })
            .collect();
        Ok(projects)
    }

    async fn list_top_folders(
        &self,
        hub: &HubRef,
        project: &ProjectRef,
    ) -> Result<Vec<FolderRef>, ClientError> {
        let url = self.endpoint(&[
            "project",
            "v1",
            "hubs",
            &hub.id,
            "projects",
            &project.id,
            "topFolders",
        ])?;
        // topFolders is not paginated
        let doc: Document = self.get_json(url).await?;
        let folders = doc
            .data
            .into_iter()
            .map(|r| FolderRef {
                name: r.display_name(),
                id: r.id,
                project_id: project.id.clone(),
                parent: ParentRef::Project {
                    hub_id: hub.id.clone(),
                    project_id: project.id.clone(),
                },
            })
            .collect();
        Ok(folders)
    }

    async fn list_children(&self, folder: &FolderRef) -> Result<Vec<FolderChild>, ClientError> {
        let url = self.endpoint(&[
            "data",
            "v1",
            "projects",
            &folder.project_id,
            "folders",
            &folder.id,
            "contents",
        ])?;
        let children = self
            .get_all_pages(url)
            .await?
            .into_iter()
            .map(|r| classify_child(r, folder))
            .collect();
        Ok(children)
    }

    async fn latest_version(&self, item: &ItemEntry) -> Result<Option<String>, ClientError> {
        let url = self.endpoint(&[
            "data",
            "v1",
            "projects",
            &item.project_id,
            "items",
            &item.id,
            "versions",
        ])?;
        // Versions are listed newest first; only the first page matters.
        let doc: Document = self.get_json(url).await?;
        Ok(doc.data.into_iter().next().map(|v| v.id))
    }

    async fn fetch_manifest(&self, derivative_id: &str) -> Result<Manifest, ClientError> {
        let encoded = encode_urn(derivative_id);
        let url = self.endpoint(&["modelderivative", "v2", "designdata", &encoded, "manifest"])?;
        self.get_json(url).await
    }
}

fn classify_child(resource: Resource, folder: &FolderRef) -> FolderChild {
    match resource.kind.as_str() {
        "folders" => FolderChild::Folder(FolderRef {
            name: resource.display_name(),
            id: resource.id,
            project_id: folder.project_id.clone(),
            parent: ParentRef::Folder {
                folder_id: folder.id.clone(),
            },
        }),
        "items" => FolderChild::Item(ItemEntry {
            name: resource.display_name(),
            tip_version: resource.tip_version(),
            last_modified: resource.last_modified(),
            id: resource.id,
            project_id: folder.project_id.clone(),
            folder_id: folder.id.clone(),
        }),
        _ => FolderChild::Other {
            id: resource.id,
            type_tag: resource.kind,
        },
    }
}
