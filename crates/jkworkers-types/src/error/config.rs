//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating the supervisor configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// A configuration value is missing or out of range
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// TLS material could not be loaded
    #[error("TLS material error at {path}: {message}")]
    TlsMaterial {
        /// File that could not be read or parsed
        path: String,
        /// Description of the failure
        message: String,
    },
}

impl ConfigError {
    /// Shorthand for a validation error on `field`.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError { field: field.to_string(), message: message.into() }
    }
}
