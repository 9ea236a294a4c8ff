//! Service id parse errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registry service id that does not follow `host:key_with_port:trailing`.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ServiceIdError {
    /// Wrong number of fields or tokens
    #[error("'{id}': {reason}")]
    MalformedId {
        /// The id as received from the registry
        id: String,
        /// Which structural rule failed
        reason: String,
    },
}
