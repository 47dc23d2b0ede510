//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum CrError {
    /// A configuration value was not recognized or is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested acceleration device is not available.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// An action outside of the action space was given to an environment.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
