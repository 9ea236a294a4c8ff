//! Reconciliation engine: the pure pipeline and the trigger scheduling
//! around it.

pub mod grouping;
pub mod queue;
pub mod reconciler;
pub mod render;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod test_support;

pub use grouping::group;
pub use queue::{PassQueue, PassRequest, TriggerReason};
pub use reconciler::{PassOutcome, Reconciler};
pub use render::{render, ConfigDocument, WORKER_TEMPLATE};
pub use supervisor::{EventAction, Supervisor};
