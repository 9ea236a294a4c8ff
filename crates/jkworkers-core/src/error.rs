//! Unified error types for jkworkers Core.

use jkworkers_types::ConfigError;
use thiserror::Error;

/// Errors raised while building collaborators (clients, addresses, TLS).
///
/// Pass-level failures use [`jkworkers_types::SyncError`]; this type covers
/// setup.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Network request or client construction failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An address could not be turned into a URL.
    #[error("Invalid address: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Address uses a scheme the HTTP client cannot dial.
    #[error("Unsupported address '{address}': {reason}")]
    UnsupportedAddress {
        /// The address as configured
        address: String,
        /// Why it cannot be used
        reason: String,
    },
}

/// Result type alias for jkworkers setup operations.
pub type AppResult<T> = Result<T, AppError>;
