//! Error types for ns-core

use thiserror::Error;

/// Main error type for ns-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Month/year out of supported range: {month}/{year}")]
    InvalidRange { month: u32, year: i32 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for ns-core
pub type Result<T> = std::result::Result<T, Error>;
