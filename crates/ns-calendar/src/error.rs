//! Error types for ns-calendar

use thiserror::Error;

/// ns-calendar error type
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error(transparent)]
    Core(#[from] ns_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CalendarError>;
