//! Preflight checks on IDs, credentials and the save destination.
//!
//! Everything here runs before the first network request, so a bad
//! invocation never leaves partial output behind.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("At least one file or folder must be specified")]
    NoItems,
    #[error("{flag} is required (or set {env})")]
    MissingCredential {
        flag: &'static str,
        env: &'static str,
    },
    #[error("--metadata requires at least one --folders value")]
    MetadataWithoutFolders,
    #[error("Could not stat directory {}; it may not exist: {source}", path.display())]
    MissingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("Could not get read/write access to directory {}: {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("File {} exists, and --overwrite is not set.", path.display())]
    DestinationExists { path: PathBuf },
}

/// Where a `save` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// Folders become subdirectories and files are written inside.
    Directory(PathBuf),
    /// One file written to exactly this path.
    SingleFile { path: PathBuf, file_id: String },
}

/// Trim IDs, drop empty ones and keep only the first occurrence of each.
pub fn normalize_ids(raw: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(raw.len());
    for id in raw.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_owned());
        }
    }
    ids
}

pub fn validate_items(folders: &[String], files: &[String]) -> Result<(), ValidationError> {
    if folders.is_empty() && files.is_empty() {
        error!("No files or folders given");
        return Err(ValidationError::NoItems);
    }
    Ok(())
}

/// Decide between directory and single-file mode and check the destination.
///
/// Directory mode applies when more than one item is requested, when the only
/// item is a folder, when `path` ends in a separator or already is a
/// directory. The directory must exist and be readable and writable.
/// Otherwise the single file is written to `path` itself, whose parent must be
/// a writable directory and which must not exist unless `overwrite` is set.
pub fn validate_save_target(
    path: &Path,
    folders: &[String],
    files: &[String],
    overwrite: bool,
) -> Result<SaveTarget, ValidationError> {
    let single_file = match (folders, files) {
        ([], [file_id]) if !ends_with_separator(path) && !path.is_dir() => Some(file_id.clone()),
        _ => None,
    };

    match single_file {
        None => {
            check_writable_dir(path)?;
            debug!(path = %path.display(), "Saving into directory");
            Ok(SaveTarget::Directory(path.to_path_buf()))
        }
        Some(file_id) => {
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            check_writable_dir(parent)?;
            if path.exists() && !overwrite {
                error!(path = %path.display(), "Single-file destination exists");
                return Err(ValidationError::DestinationExists {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), file_id, "Saving single file");
            Ok(SaveTarget::SingleFile {
                path: path.to_path_buf(),
                file_id,
            })
        }
    }
}

/// `path` must be an existing directory we can list and create files in.
pub fn check_writable_dir(path: &Path) -> Result<(), ValidationError> {
    let metadata = std::fs::metadata(path).map_err(|e| ValidationError::MissingDirectory {
        path: path.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(ValidationError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    let inaccessible = |e| ValidationError::Inaccessible {
        path: path.to_path_buf(),
        source: e,
    };
    std::fs::read_dir(path).map_err(inaccessible)?;
    tempfile::NamedTempFile::new_in(path).map_err(inaccessible)?;
    Ok(())
}

fn ends_with_separator(path: &Path) -> bool {
    path.to_string_lossy()
        .ends_with(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR)
}
