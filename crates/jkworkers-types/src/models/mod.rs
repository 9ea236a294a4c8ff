//! Domain models.

pub mod config;
pub mod event;
pub mod service;
pub mod service_id;

pub use config::{DockerConfig, ReloadPolicy, SupervisorConfig};
pub use event::{LifecycleEvent, LifecycleStatus};
pub use service::{ClusterMembership, ServiceEntry, Snapshot};
pub use service_id::ServiceId;
