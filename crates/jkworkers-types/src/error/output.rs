//! Errors from the two output collaborators: persist and reload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Writing the rendered document failed.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum PersistError {
    /// Temp file write, sync or rename failed (permission denied, disk full, etc)
    #[error("Failed to write {path}: {message}")]
    Write {
        /// Target path
        path: String,
        /// IO error description
        message: String,
    },

    /// Target path has no parent directory or file name
    #[error("Invalid target path {path}")]
    InvalidPath {
        /// Offending path
        path: String,
    },
}

/// Running the reload command failed.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ReloadError {
    /// The command could not be spawned or waited on
    #[error("Failed to run reload command {command}: {message}")]
    Spawn {
        /// Command path
        command: String,
        /// IO error description
        message: String,
    },
}
