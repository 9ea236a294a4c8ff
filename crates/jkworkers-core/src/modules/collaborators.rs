//! Traits the reconciliation engine talks to.
//!
//! The engine never touches the network, the filesystem or child processes
//! directly; each of those sits behind one of these seams so passes can be
//! driven against in-memory doubles.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use jkworkers_types::{
    EventSourceError, LifecycleEvent, PersistError, RegistryError, ReloadError, Snapshot,
};

/// Lifecycle notifications, in delivery order.
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<LifecycleEvent, EventSourceError>> + Send>>;

/// Source of full registry snapshots.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn list_services(&self) -> Result<Snapshot, RegistryError>;
}

/// Source of container lifecycle notifications.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn subscribe(&self) -> Result<EventStream, EventSourceError>;
}

/// Destination of the rendered document.
#[async_trait]
pub trait ConfigSink: Send + Sync {
    /// Replace the stored document with `text`.
    async fn persist(&self, text: &str) -> Result<(), PersistError>;
}

/// Outcome of a reload command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadStatus {
    /// Exit code, `None` if terminated by a signal
    pub exit_code: Option<i32>,
}

impl ReloadStatus {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Makes the reverse proxy re-read its configuration.
#[async_trait]
pub trait Reloader: Send + Sync {
    /// A non-zero exit is reported in the status, not as an error.
    async fn reload(&self) -> Result<ReloadStatus, ReloadError>;
}
