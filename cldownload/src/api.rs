#![doc = "Classeur HTTP client: implements the core `ClasseurApi` trait over reqwest."]
//
//! # Classeur API client
//!
//! [`ClasseurClient`] talks to the Classeur REST API (`/api/v1`) using HTTP
//! basic auth with the user ID and API key. It is the production
//! implementation of [`ClasseurApi`]; tests use the core crate's mock instead.
//!
//! - Errors are mapped onto [`ApiError`] and never retried.
//! - Requests for an empty list of IDs return an empty result without touching
//!   the network.

use async_trait::async_trait;
use cldownload_core::contract::{ApiError, ClasseurApi, FileContent, RemoteNode};
use futures::future::try_join_all;
use reqwest::Url;
use serde::de::DeserializeOwned;

pub const DEFAULT_HOST: &str = "app.classeur.io";

/// Credentials and endpoint for one Classeur account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub api_key: String,
    pub host: String,
}

pub struct ClasseurClient {
    http: reqwest::Client,
    base: Url,
    user_id: String,
    api_key: String,
}

impl ClasseurClient {
    pub fn new(credentials: &Credentials) -> anyhow::Result<Self> {
        let base = base_url(&credentials.host)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("cldownload/", env!("CARGO_PKG_VERSION")))
            .build()?;
        tracing::info!(
            base_url = %base,
            user_id = %credentials.user_id,
            api_key_set = !credentials.api_key.is_empty(),
            "Initialized Classeur client"
        );
        Ok(Self {
            http,
            base,
            user_id: credentials.user_id.clone(),
            api_key: credentials.api_key.clone(),
        })
    }

    /// URL of `segments` below the API base, each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let shown = url.to_string();
        tracing::debug!(url = %shown, "GET");
        let response = self
            .http
            .get(url)
            .basic_auth(&self.user_id, Some(&self.api_key))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %shown, "Request failed");
                ApiError::Transport {
                    url: shown.clone(),
                    source: Box::new(e),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport {
            url: shown.clone(),
            source: Box::new(e),
        })?;
        if !status.is_success() {
            tracing::error!(status = %status, url = %shown, "Classeur API returned error");
            return Err(ApiError::Status {
                url: shown,
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: shown,
            source: Box::new(e),
        })
    }
}

/// `https://<host>/api/v1`, or `<host>/api/v1` when `host` already has a scheme.
pub fn base_url(host: &str) -> anyhow::Result<Url> {
    let host = host.trim_end_matches('/');
    let raw = if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}/api/v1")
    } else {
        format!("https://{host}/api/v1")
    };
    let url = Url::parse(&raw)?;
    if url.cannot_be_a_base() {
        anyhow::bail!("{raw} is not a usable API base URL");
    }
    Ok(url)
}

#[async_trait]
impl ClasseurApi for ClasseurClient {
    async fn get_folders(&self, ids: Vec<String>) -> Result<Vec<RemoteNode>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(count = ids.len(), "Fetching folders");
        let requests = ids
            .iter()
            .map(|id| self.fetch::<RemoteNode>(self.endpoint(&["folders", id.as_str()])));
        let folders = try_join_all(requests).await?;
        // A folder is a folder even when the server omits its empty file list.
        Ok(folders
            .into_iter()
            .map(|mut folder| {
                folder.files.get_or_insert_with(Vec::new);
                folder
            })
            .collect())
    }

    async fn get_files(&self, ids: Vec<String>) -> Result<Vec<RemoteNode>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(count = ids.len(), "Fetching file metadata");
        let mut url = self.endpoint(&["metadata", "files"]);
        url.query_pairs_mut().append_pair("id", &ids.join(","));
        let stubs: Vec<RemoteNode> = self.fetch(url).await?;
        Ok(stubs
            .into_iter()
            .map(|mut stub| {
                stub.files = None;
                stub
            })
            .collect())
    }

    async fn get_file(&self, id: String) -> Result<FileContent, ApiError> {
        self.fetch(self.endpoint(&["files", id.as_str()])).await
    }
}
