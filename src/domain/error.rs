//! Error types for the hangar coordinator.
//!
//! This module defines the centralized error type [`HangarError`] and a type alias
//! [`Result`] used throughout the crate. Errors never reach the page user: the
//! runtime logs them and the coordinator resolves request problems into
//! notifications instead.

use thiserror::Error;

/// The main error type for coordinator operations.
///
/// # Examples
///
/// ```
/// use hangar_coordinator::HangarError;
///
/// fn validate_mount(path: &str) -> Result<(), HangarError> {
///     if path.starts_with('/') {
///         Ok(())
///     } else {
///         Err(HangarError::Config(format!("mount path must be absolute: {path}")))
///     }
/// }
///
/// assert!(validate_mount("corp-inventory").is_err());
/// ```
#[derive(Debug, Error)]
pub enum HangarError {
    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be built or a request could not be prepared.
    ///
    /// Failures of individual requests are not errors; they travel back to the
    /// coordinator as [`RequestOutcome::Failure`](crate::domain::RequestOutcome).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A replay scenario is malformed.
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// An event referenced a control that was never bound on this page.
    #[error("Unknown control: {0}")]
    UnknownControl(u32),
}

impl From<toml::de::Error> for HangarError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A specialized `Result` type for coordinator operations.
pub type Result<T> = std::result::Result<T, HangarError>;
