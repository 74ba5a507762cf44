//! Error types for tree lookup and materialization.
//!
//! The variants separate the phase that failed: lookup ([`TreeError`]),
//! remote fetch ([`MaterializeError::Api`]) and local writes (everything else).

use std::io;
use std::path::{Path, PathBuf};

use crate::contract::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("no node with identifier {identifier:?} in the tree")]
    NotFound { identifier: String },
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("File {} exists, and --overwrite is not set.", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("access denied writing {}: {source}", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not serialize content for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{name:?} cannot be used as a file or directory name")]
    UnsafeName { name: String },
    #[error("file {name:?} has no id to fetch it by")]
    MissingFileId { name: String },
}

impl MaterializeError {
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => MaterializeError::AccessDenied {
                path: path.to_path_buf(),
                source,
            },
            io::ErrorKind::AlreadyExists => MaterializeError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => MaterializeError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
