#![allow(unused)]

//! # contract: the remote document store as seen by this crate
//!
//! This module defines the [`ClasseurApi`] trait and the plain data types it
//! returns. The trait is the single seam between the tree logic and the
//! network: the CLI crate provides an HTTP implementation, tests use the
//! generated `MockClasseurApi`.
//!
//! ## Raw fields
//! Classeur objects carry many more fields than the ones this crate reads.
//! [`RemoteNode`] and [`FileContent`] keep all of them in `extra` so that
//! metadata-mode writes reproduce the object as the server sent it.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; enable the `test-export-mocks`
//!   feature (on by default) to use `MockClasseurApi` from other crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mockall::{automock, predicate::*};

/// Boxed error used as the source of transport and decode failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A folder or file stub as returned by the folder and file listing endpoints.
///
/// Folders carry their children under `files` (also accepted as `children`).
/// Whether that attribute is present is what makes an object a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "children", skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<RemoteNode>>,
    /// Every other field of the server object, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteNode {
    /// A file stub with the given id and name.
    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A folder with the given id, name and children.
    pub fn folder(id: impl Into<String>, name: impl Into<String>, children: Vec<RemoteNode>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            files: Some(children),
            ..Self::default()
        }
    }
}

/// Full content of a single file, as returned by the file endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Absent when the server sends no `content` object; never invented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<FileText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `content` object of a file. `text` is the rendered markdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileText {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileContent {
    /// A file whose markdown content is `text`.
    pub fn markdown(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            content: Some(FileText {
                text: text.into(),
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    /// Markdown text, empty when the file has no content.
    pub fn text(&self) -> &str {
        self.content.as_ref().map(|c| c.text.as_str()).unwrap_or_default()
    }

    pub fn into_text(self) -> String {
        self.content.map(|c| c.text).unwrap_or_default()
    }
}

/// Errors raised by a [`ClasseurApi`] implementation.
///
/// These are passed through unmodified; this crate never retries.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    /// True when the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

/// Read access to a Classeur document store.
///
/// The trait is `Send + Sync` so that one client can serve every concurrent
/// fetch of a materialization.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ClasseurApi: Send + Sync {
    /// Fetch folders (with their child stubs) by ID.
    async fn get_folders(&self, ids: Vec<String>) -> Result<Vec<RemoteNode>, ApiError>;

    /// Fetch file stubs (id, name and metadata, no content) by ID.
    async fn get_files(&self, ids: Vec<String>) -> Result<Vec<RemoteNode>, ApiError>;

    /// Fetch one file including its content.
    async fn get_file(&self, id: String) -> Result<FileContent, ApiError>;
}
