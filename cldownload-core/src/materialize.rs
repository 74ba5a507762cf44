//! Recursive Materializer: writes a [`Tree`] (or part of it) to disk.
//!
//! Starting from a node found by identifier, folders become directories and
//! files are fetched through the [`ClasseurApi`] and written with the
//! [`writer`](crate::writer) contract. All children of a folder are processed
//! concurrently, together with the folder's sidecar metadata file.
//!
//! # Failure semantics
//! A folder step waits for every child subtree to settle, even after one of
//! them failed, and then reports the first error in child order. Nothing in
//! flight is cancelled and nothing already written is rolled back.
//!
//! # Concurrency
//! Fan-out is unbounded by default. With
//! [`MaterializeOptions::max_concurrency`] set, file fetch+write operations
//! share a semaphore; directory creation is never throttled, so nested
//! folders cannot starve each other.

use std::path::{Path, PathBuf};

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::{ContentMode, MaterializeOptions};
use crate::contract::ClasseurApi;
use crate::error::MaterializeError;
use crate::identity::{canonical_id, IdentityMode};
use crate::node::{FileNode, FolderNode, Node};
use crate::tree::Tree;
use crate::writer::{with_suffix, write_payload, Payload, WriteOptions};

pub const FOLDER_METADATA_SUFFIX: &str = ".folder_metadata.json";

/// Paths produced by a materialization, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
    pub sidecars: Vec<PathBuf>,
}

impl MaterializeReport {
    fn merge(&mut self, other: MaterializeReport) {
        self.files.extend(other.files);
        self.directories.extend(other.directories);
        self.sidecars.extend(other.sidecars);
    }

    fn sort(&mut self) {
        self.files.sort();
        self.directories.sort();
        self.sidecars.sort();
    }
}

pub struct Materializer<'a, A: ClasseurApi + ?Sized> {
    api: &'a A,
    options: MaterializeOptions,
    limiter: Option<Semaphore>,
}

impl<'a, A: ClasseurApi + ?Sized> Materializer<'a, A> {
    pub fn new(api: &'a A, options: MaterializeOptions) -> Self {
        let limiter = options
            .max_concurrency
            .map(|n| Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS)));
        Self {
            api,
            options,
            limiter,
        }
    }

    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    /// Materialize the subtree at `identifier` below `destination`.
    ///
    /// The node's path segments are joined onto `destination`; materializing
    /// the root writes its children directly into `destination`.
    pub async fn materialize(
        &self,
        tree: &Tree,
        identifier: &str,
        destination: &Path,
    ) -> Result<MaterializeReport, MaterializeError> {
        let found = tree.find_node(identifier)?;
        info!(
            identifier,
            destination = %destination.display(),
            depth = found.segments.len(),
            "Materializing subtree"
        );
        let mut report = self
            .visit(destination, found.node, found.segments, tree.mode())
            .await?;
        report.sort();
        info!(
            files = report.files.len(),
            directories = report.directories.len(),
            sidecars = report.sidecars.len(),
            "Materialization complete"
        );
        Ok(report)
    }

    fn visit<'s>(
        &'s self,
        base: &'s Path,
        node: &'s Node,
        segments: Vec<String>,
        mode: IdentityMode,
    ) -> BoxFuture<'s, Result<MaterializeReport, MaterializeError>> {
        async move {
            match node {
                Node::Folder(folder) => self.visit_folder(base, folder, segments, mode).await,
                Node::File(file) => self.visit_file(base, file, &segments).await,
            }
        }
        .boxed()
    }

    async fn visit_folder(
        &self,
        base: &Path,
        folder: &FolderNode,
        segments: Vec<String>,
        mode: IdentityMode,
    ) -> Result<MaterializeReport, MaterializeError> {
        let mut report = MaterializeReport::default();
        let is_root = segments.is_empty();
        let target = local_path(base, &segments)?;

        if !is_root {
            tokio::fs::create_dir_all(&target)
                .await
                .map_err(|e| MaterializeError::from_io(&target, e))?;
            debug!(path = %target.display(), "Created directory");
            report.directories.push(target.clone());
        }

        let sidecar = async {
            if !self.options.folder_metadata || is_root {
                return Ok(None);
            }
            let path = with_suffix(&target, FOLDER_METADATA_SUFFIX);
            let options = WriteOptions {
                overwrite: self.options.overwrite,
                add_extension: false,
            };
            write_payload(&path, &Payload::Json(folder.raw.clone()), options)
                .await
                .map(Some)
        };

        let children = join_all(folder.children.iter().map(|child| {
            let mut child_segments = segments.clone();
            child_segments.push(canonical_id(child, mode).to_owned());
            self.visit(base, child, child_segments, mode)
        }));

        let (sidecar, children) = futures::join!(sidecar, children);

        let mut first_error = None;
        match sidecar {
            Ok(Some(path)) => report.sidecars.push(path),
            Ok(None) => {}
            Err(e) => first_error = Some(e),
        }
        for outcome in children {
            match outcome {
                Ok(child_report) => report.merge(child_report),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!(error = %e, "Additional failure in the same folder"),
            }
        }

        match first_error {
            Some(e) => {
                error!(path = %target.display(), error = %e, "Folder materialization failed");
                Err(e)
            }
            None => Ok(report),
        }
    }

    async fn visit_file(
        &self,
        base: &Path,
        file: &FileNode,
        segments: &[String],
    ) -> Result<MaterializeReport, MaterializeError> {
        let target = local_path(base, segments)?;
        let id = file.id.clone().ok_or_else(|| MaterializeError::MissingFileId {
            name: file.name.clone().unwrap_or_default(),
        })?;

        // Held until the write finishes. The semaphore is never closed.
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        debug!(file_id = %id, path = %target.display(), "Fetching file");
        let file_content = self.api.get_file(id.clone()).await.map_err(|e| {
            error!(file_id = %id, error = %e, "Failed to fetch file");
            MaterializeError::Api(e)
        })?;

        let payload = match self.options.content {
            ContentMode::Markdown => Payload::Text(file_content.into_text()),
            ContentMode::Metadata => {
                let value = serde_json::to_value(&file_content).map_err(|e| {
                    MaterializeError::Serialize {
                        path: target.clone(),
                        source: e,
                    }
                })?;
                Payload::Json(value)
            }
        };
        let options = WriteOptions {
            overwrite: self.options.overwrite,
            add_extension: self.options.add_extension,
        };
        let written = write_payload(&target, &payload, options).await?;

        Ok(MaterializeReport {
            files: vec![written],
            ..MaterializeReport::default()
        })
    }
}

/// Join canonical identifiers onto `base` as path components.
///
/// Separators inside an identifier are replaced with `_`; identifiers that
/// would not name a child of their parent ("", ".", "..") are rejected.
pub fn local_path(base: &Path, segments: &[String]) -> Result<PathBuf, MaterializeError> {
    let mut path = base.to_path_buf();
    for segment in segments {
        path.push(path_component(segment)?);
    }
    Ok(path)
}

fn path_component(segment: &str) -> Result<String, MaterializeError> {
    if segment.is_empty() || segment == "." || segment == ".." {
        return Err(MaterializeError::UnsafeName {
            name: segment.to_owned(),
        });
    }
    Ok(segment.replace(['/', '\\'], "_"))
}
