//! Typed error definitions for jkworkers.
//!
//! Every failure a reconciliation pass can hit has its own enum so callers
//! can tell an aborted pass (registry) from a partial one (service id) or a
//! completed-but-unreloaded one (reload). All errors are:
//!
//! - **Serializable** for structured logging via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants

mod config;
mod event_source;
mod output;
mod registry;
mod service_id;

pub use config::ConfigError;
pub use event_source::EventSourceError;
pub use output::{PersistError, ReloadError};
pub use registry::RegistryError;
pub use service_id::ServiceIdError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of a reconciliation pass or of the event source feeding it.
///
/// Configuration problems surface before any pass runs, as [`ConfigError`].
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "error")]
pub enum SyncError {
    /// Snapshot fetch failed; the pass was aborted before grouping.
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(#[from] RegistryError),

    /// One entry's id failed to parse; the entry was skipped.
    #[error("Malformed service id: {0}")]
    MalformedServiceId(#[from] ServiceIdError),

    /// Writing the rendered document failed; the previous file is retained.
    #[error("Persist failure: {0}")]
    PersistFailure(#[from] PersistError),

    /// The reload command could not be run.
    #[error("Reload failure: {0}")]
    ReloadFailure(#[from] ReloadError),

    /// The lifecycle event source failed.
    #[error("Event source error: {0}")]
    EventSource(#[from] EventSourceError),
}
