//! Error handling for the shipment updater
//!
//! This module defines the error type used throughout the crate. Per-row
//! failures are carried as values in the batch report; only run-level
//! failures surface as `ShipmentError` from the runner.

use thiserror::Error;

/// Result type alias for the shipment updater
pub type Result<T> = std::result::Result<T, ShipmentError>;

/// Main error type for the shipment updater
#[derive(Error, Debug)]
pub enum ShipmentError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Request signing errors
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Malformed request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required run argument was absent
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Input CSV does not exist
    #[error("CSV file not found: {0}")]
    InputNotFound(String),

    /// Capability tag has no handler
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// Structured request could not be understood
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ShipmentError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn signing<S: Into<String>>(message: S) -> Self {
        Self::Signing(message.into())
    }

    pub fn missing_argument<S: Into<String>>(name: S) -> Self {
        Self::MissingArgument(name.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }
}
