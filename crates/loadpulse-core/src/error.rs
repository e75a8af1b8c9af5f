//! Shared error type across loadpulse crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, LoadPulseError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum LoadPulseError {
    #[error("config: {0}")]
    Config(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}
