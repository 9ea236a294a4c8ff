//! Runs the configured reconfigure command.

use async_trait::async_trait;
use std::path::PathBuf;

use super::collaborators::{ReloadStatus, Reloader};
use jkworkers_types::ReloadError;

/// Runs an executable with no arguments and waits for it.
///
/// The child is not killed if the waiting future is dropped; a restart
/// script interrupted halfway can leave the proxy down.
pub struct CommandReloader {
    command: PathBuf,
}

impl CommandReloader {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self { command: command.into() }
    }
}

#[async_trait]
impl Reloader for CommandReloader {
    async fn reload(&self) -> Result<ReloadStatus, ReloadError> {
        tracing::info!("🔁 Running reload command {}", self.command.display());

        let status = tokio::process::Command::new(&self.command)
            .status()
            .await
            .map_err(|e| ReloadError::Spawn {
                command: self.command.display().to_string(),
                message: e.to_string(),
            })?;

        let result = ReloadStatus { exit_code: status.code() };
        if result.success() {
            tracing::info!("✅ Reload command finished");
        } else {
            tracing::warn!("⚠️ Reload command exited with {}", status);
        }
        Ok(result)
    }
}
