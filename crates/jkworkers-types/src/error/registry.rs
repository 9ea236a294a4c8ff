//! Service registry errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while fetching a registry snapshot.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum RegistryError {
    /// Registry could not be reached at all
    #[error("Registry at {address} unreachable: {message}")]
    Unreachable {
        /// Address that was queried
        address: String,
        /// Transport error description
        message: String,
    },

    /// Registry answered with a non-success HTTP status
    #[error("Registry returned HTTP {status}: {message}")]
    BadStatus {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Registry answered but the payload could not be decoded
    #[error("Registry response could not be decoded: {message}")]
    Decode {
        /// Decoder error description
        message: String,
    },
}
