//! Atomic file writer for the rendered document.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::collaborators::ConfigSink;
use jkworkers_types::PersistError;

/// Writes to a temp file next to the target, then renames it over the
/// target, so the proxy never reads a half-written file.
pub struct AtomicFileSink {
    path: PathBuf,
}

impl AtomicFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf, PersistError> {
        let file_name = self.path.file_name().ok_or_else(|| PersistError::InvalidPath {
            path: self.path.display().to_string(),
        })?;
        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(".tmp");
        Ok(self.path.with_file_name(temp_name))
    }

    fn write_error(&self, e: &std::io::Error) -> PersistError {
        PersistError::Write { path: self.path.display().to_string(), message: e.to_string() }
    }
}

#[async_trait]
impl ConfigSink for AtomicFileSink {
    async fn persist(&self, text: &str) -> Result<(), PersistError> {
        let temp_path = self.temp_path()?;

        if let Err(e) = tokio::fs::write(&temp_path, text).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(self.write_error(&e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(self.write_error(&e));
        }

        tracing::debug!("💾 Wrote {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }
}
