//! Supervisor configuration models.
//!
//! Built once at startup from flags and environment, validated, then passed
//! by reference into every collaborator. Nothing reads the environment after
//! that point.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::LifecycleStatus;
use crate::error::ConfigError;

// ============================================================================
// Defaults
// ============================================================================

/// Tag a registry service must carry to be rendered.
pub const DEFAULT_MEMBERSHIP_TAG: &str = "tomcat-service";
/// Wait after a `start` event before reconciling, to let the instance register.
pub const DEFAULT_START_GRACE_MS: u64 = 3_000;
pub const DEFAULT_CONSUL_ADDRESS: &str = "127.0.0.1:8500";
pub const DEFAULT_DOCKER_ADDRESS: &str = "tcp://127.0.0.1:2375";
pub const DEFAULT_WORKERS_FILE: &str = "/usr/local/apache2/conf/workers.properties";
pub const DEFAULT_RECONFIGURE_COMMAND: &str = "/usr/local/apache2/bin/restart.sh";

// ============================================================================
// Reload policy
// ============================================================================

/// Which triggers are followed by a proxy reload once the pass succeeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReloadPolicy {
    /// Reload after the initial pass at startup
    pub on_startup: bool,
    /// Reload after a `start` event
    pub on_start: bool,
    /// Reload after a `die` event
    pub on_die: bool,
    /// Reload after a `stop` or `kill` event
    pub on_stop: bool,
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        Self { on_startup: true, on_start: true, on_die: false, on_stop: false }
    }
}

impl ReloadPolicy {
    /// Whether a pass triggered by `status` should reload.
    ///
    /// `None` means the status does not trigger a pass at all.
    pub fn reload_after(&self, status: &LifecycleStatus) -> Option<bool> {
        match status {
            LifecycleStatus::Start => Some(self.on_start),
            LifecycleStatus::Die => Some(self.on_die),
            LifecycleStatus::Stop | LifecycleStatus::Kill => Some(self.on_stop),
            LifecycleStatus::Other(_) => None,
        }
    }
}

// ============================================================================
// Docker
// ============================================================================

/// Docker engine connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DockerConfig {
    /// `tcp://host:port` or `http(s)://host:port`
    pub address: String,
    /// Directory holding `cert.pem`, `key.pem` and `ca.pem`; `None` disables TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<PathBuf>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self { address: DEFAULT_DOCKER_ADDRESS.to_string(), tls_cert_path: None }
    }
}

impl DockerConfig {
    pub fn tls_enabled(&self) -> bool {
        self.tls_cert_path.is_some()
    }
}

// ============================================================================
// Supervisor
// ============================================================================

/// Immutable configuration of one supervisor process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub docker: DockerConfig,
    /// Consul agent `host:port` or URL
    pub consul_address: String,
    /// Where the rendered document is written
    pub workers_file: PathBuf,
    /// Executable run (without arguments) to make the proxy re-read the file
    pub reconfigure_command: PathBuf,
    pub membership_tag: String,
    pub start_grace_ms: u64,
    #[serde(default)]
    pub reload_policy: ReloadPolicy,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            docker: DockerConfig::default(),
            consul_address: DEFAULT_CONSUL_ADDRESS.to_string(),
            workers_file: PathBuf::from(DEFAULT_WORKERS_FILE),
            reconfigure_command: PathBuf::from(DEFAULT_RECONFIGURE_COMMAND),
            membership_tag: DEFAULT_MEMBERSHIP_TAG.to_string(),
            start_grace_ms: DEFAULT_START_GRACE_MS,
            reload_policy: ReloadPolicy::default(),
        }
    }
}

impl SupervisorConfig {
    pub fn start_grace(&self) -> Duration {
        Duration::from_millis(self.start_grace_ms)
    }

    /// Reject configurations the supervisor cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.membership_tag.trim().is_empty() {
            return Err(ConfigError::invalid("membership_tag", "must not be empty"));
        }
        if self.consul_address.trim().is_empty() {
            return Err(ConfigError::invalid("consul_address", "must not be empty"));
        }
        if self.docker.address.trim().is_empty() {
            return Err(ConfigError::invalid("docker.address", "must not be empty"));
        }
        if self.workers_file.file_name().is_none() {
            return Err(ConfigError::invalid(
                "workers_file",
                format!("{} does not name a file", self.workers_file.display()),
            ));
        }
        if self.reconfigure_command.as_os_str().is_empty() {
            return Err(ConfigError::invalid("reconfigure_command", "must not be empty"));
        }
        Ok(())
    }
}
