//! The write contract shared by file and sidecar writes.
//!
//! Every write checks for an existing destination first. Without overwrite an
//! existing destination is an [`MaterializeError::AlreadyExists`] and nothing is
//! written. The check and the write are separate steps, so two concurrent
//! writers targeting one path can still race.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error};

use crate::error::MaterializeError;

/// Content to write: markdown text or a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    pub fn extension(&self) -> &'static str {
        match self {
            Payload::Text(_) => ".md",
            Payload::Json(_) => ".json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub overwrite: bool,
    pub add_extension: bool,
}

/// Write `payload` at `path`, returning the path actually written.
pub async fn write_payload(
    path: &Path,
    payload: &Payload,
    options: WriteOptions,
) -> Result<PathBuf, MaterializeError> {
    let target = if options.add_extension {
        with_suffix(path, payload.extension())
    } else {
        path.to_path_buf()
    };

    if !options.overwrite {
        let exists = tokio::fs::try_exists(&target)
            .await
            .map_err(|e| MaterializeError::from_io(&target, e))?;
        if exists {
            error!(path = %target.display(), "Destination exists and overwrite is not set");
            return Err(MaterializeError::AlreadyExists { path: target });
        }
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MaterializeError::from_io(parent, e))?;
    }

    let bytes = match payload {
        Payload::Text(text) => text.clone().into_bytes(),
        Payload::Json(value) => {
            serde_json::to_vec_pretty(value).map_err(|e| MaterializeError::Serialize {
                path: target.clone(),
                source: e,
            })?
        }
    };
    tokio::fs::write(&target, bytes)
        .await
        .map_err(|e| MaterializeError::from_io(&target, e))?;

    debug!(path = %target.display(), "Wrote file");
    Ok(target)
}

/// Append `suffix` to the last path component, keeping any dots already in it.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
