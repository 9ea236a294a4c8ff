//! # jkworkers Types
//!
//! Core types, configuration, and error definitions for the jkworkers
//! synchroniser.
//!
//! - **`error`** - Typed error hierarchy for the registry, event source,
//!   service ids, persistence and reload
//! - **`models`** - Domain models (ServiceEntry, ClusterMembership,
//!   ServiceId, LifecycleEvent, SupervisorConfig)
//!
//! ## Architecture Role
//!
//! ```text
//!            jkworkers-types (this crate)
//!                     │
//!                     ▼
//!              jkworkers-core
//!       (engine + Consul/Docker/file/command)
//!                     │
//!                     ▼
//!             jkworkers-server
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for logging and fixtures
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{
    ConfigError, EventSourceError, PersistError, RegistryError, ReloadError, ServiceIdError,
    SyncError,
};

// Re-export core model types
pub use models::{
    ClusterMembership, DockerConfig, LifecycleEvent, LifecycleStatus, ReloadPolicy, ServiceEntry,
    ServiceId, Snapshot, SupervisorConfig,
};
