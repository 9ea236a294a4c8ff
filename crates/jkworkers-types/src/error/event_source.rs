//! Lifecycle event source errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the container lifecycle event subscription.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum EventSourceError {
    /// The subscription could not be established
    #[error("Event source at {address} unavailable: {message}")]
    Connect {
        /// Address of the event source
        address: String,
        /// Transport error description
        message: String,
    },

    /// The subscription broke while streaming
    #[error("Event stream failed: {message}")]
    Stream {
        /// Transport error description
        message: String,
    },

    /// The event stream ended
    #[error("Event stream closed")]
    Closed,
}
