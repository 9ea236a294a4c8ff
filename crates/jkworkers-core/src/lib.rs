//! # jkworkers Core
//!
//! Keeps a mod_jk `workers.properties` in step with the tagged services a
//! Consul agent knows about, re-rendering it whenever Docker reports a
//! container lifecycle change.
//!
//! ## Architecture
//!
//! ```text
//! jkworkers-core/src/
//! ├── engine/            # pure pipeline + scheduling
//! │   ├── grouping.rs    # snapshot → ClusterMembership (tag filter)
//! │   ├── render.rs      # ClusterMembership → workers.properties text
//! │   ├── reconciler.rs  # fetch → group → render → persist → reload
//! │   ├── queue.rs       # single-slot coalescing pass queue
//! │   └── supervisor.rs  # event policy, grace delay, worker task
//! └── modules/           # collaborators
//!     ├── collaborators.rs  # traits the engine talks to
//!     ├── http.rs           # reqwest client + address handling
//!     ├── consul.rs         # ServiceRegistry over the agent API
//!     ├── docker.rs         # EventSource over /events
//!     ├── persist.rs        # atomic temp-file + rename writer
//!     └── reload.rs         # runs the reconfigure command
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod engine;
pub mod error;
pub mod modules;

// Re-export commonly used types
pub use engine::{
    group, render, ConfigDocument, EventAction, PassOutcome, PassQueue, PassRequest, Reconciler,
    Supervisor, TriggerReason, WORKER_TEMPLATE,
};
pub use error::{AppError, AppResult};
pub use modules::collaborators::{
    ConfigSink, EventSource, EventStream, ReloadStatus, Reloader, ServiceRegistry,
};
pub use modules::{AtomicFileSink, CommandReloader, ConsulRegistry, DockerEvents};
