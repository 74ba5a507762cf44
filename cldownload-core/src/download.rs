//! High-level operations: list, save a tree, save a single file.
//!
//! Each operation seeds its input from the [`ClasseurApi`] and hands it to the
//! tree, printer or materializer. These are the entry points used by the CLI
//! crate and the integration tests.
//!
//! # Seeding
//! Folders and files are requested concurrently. Both requests settle before
//! either error is reported; folders come before files in the resulting tree.

use std::path::Path;

use tracing::{error, info};

use crate::config::{ContentMode, MaterializeOptions};
use crate::contract::{ApiError, ClasseurApi};
use crate::error::MaterializeError;
use crate::identity::IdentityMode;
use crate::materialize::{MaterializeReport, Materializer};
use crate::tree::Tree;
use crate::writer::{write_payload, Payload, WriteOptions};

/// Fetch `folders` and `files` and build a tree over them.
pub async fn seed_tree<A>(
    api: &A,
    root_label: Option<String>,
    folders: &[String],
    files: &[String],
    mode: IdentityMode,
) -> Result<Tree, ApiError>
where
    A: ClasseurApi + ?Sized,
{
    info!(folders = folders.len(), files = files.len(), "Fetching folders and files");
    let (folder_result, file_result) = futures::join!(
        api.get_folders(folders.to_vec()),
        api.get_files(files.to_vec())
    );
    let mut items = folder_result.map_err(|e| {
        error!(error = %e, "Failed to fetch folders");
        e
    })?;
    let stubs = file_result.map_err(|e| {
        error!(error = %e, "Failed to fetch files");
        e
    })?;
    items.extend(stubs);
    Ok(Tree::from_remote(root_label, items, mode))
}

/// Render the hierarchy of `folders` and `files` for the console.
pub async fn list_tree<A>(
    api: &A,
    folders: &[String],
    files: &[String],
    mode: IdentityMode,
) -> Result<String, ApiError>
where
    A: ClasseurApi + ?Sized,
{
    let tree = seed_tree(api, None, folders, files, mode).await?;
    Ok(tree.render())
}

/// Save `folders` as directories and `files` as files inside `destination`.
pub async fn save_tree<A>(
    api: &A,
    destination: &Path,
    folders: &[String],
    files: &[String],
    mode: IdentityMode,
    options: MaterializeOptions,
) -> Result<MaterializeReport, MaterializeError>
where
    A: ClasseurApi + ?Sized,
{
    options.trace_loaded();
    let label = destination.to_string_lossy().into_owned();
    let tree = seed_tree(api, Some(label.clone()), folders, files, mode).await?;
    Materializer::new(api, options)
        .materialize(&tree, &label, destination)
        .await
}

/// Save one file's content at exactly `path`, without adding an extension.
pub async fn save_single_file<A>(
    api: &A,
    file_id: &str,
    path: &Path,
    content: ContentMode,
    overwrite: bool,
) -> Result<std::path::PathBuf, MaterializeError>
where
    A: ClasseurApi + ?Sized,
{
    info!(file_id, path = %path.display(), "Saving single file");
    let file = api.get_file(file_id.to_owned()).await?;
    let payload = match content {
        ContentMode::Markdown => Payload::Text(file.into_text()),
        ContentMode::Metadata => {
            let value = serde_json::to_value(&file).map_err(|e| MaterializeError::Serialize {
                path: path.to_path_buf(),
                source: e,
            })?;
            Payload::Json(value)
        }
    };
    let options = WriteOptions {
        overwrite,
        add_extension: false,
    };
    write_payload(path, &payload, options).await
}
