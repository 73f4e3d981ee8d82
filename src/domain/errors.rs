//! Domain error types
//!
//! This module defines the error hierarchy for Harvest. Errors are grouped by
//! the stage that produces them so the ingestion loop and the export engine can
//! decide locally whether a failure is retryable, fatal to pagination, or
//! isolated to a single record or file.

use std::path::PathBuf;
use thiserror::Error;

/// Main Harvest error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote API errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Malformed JSON in a response body or input file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failure isolated to one record
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Directory or file write failure
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Classification attached to every [`FetchError`]
///
/// The ingestion loop backs off and continues on `TransientServer` and stops
/// paginating on `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// 5xx-class failure or throttling; the next page is still attempted
    TransientServer,
    /// Anything else; pagination stops but collected records are kept
    Other,
}

/// Remote API errors
///
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Failed to reach the server
    #[error("Failed to connect to API: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Body was not a JSON array of records
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Classify the error for the pagination state machine
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::ServerError { .. } | FetchError::RateLimited(_) => {
                FetchErrorKind::TransientServer
            }
            _ => FetchErrorKind::Other,
        }
    }

    /// Build the appropriate variant for a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => FetchError::RateLimited(message),
            500..=599 => FetchError::ServerError { status, message },
            _ => FetchError::ClientError { status, message },
        }
    }
}

/// Errors scoped to a single record
#[derive(Debug, Error)]
pub enum RecordError {
    /// Neither `profile.user_id` nor `username` is usable
    #[error("Record has no usable identity (profile.user_id or username)")]
    Unidentifiable,

    /// Record could not be serialized for the full-record dump
    #[error("Failed to serialize record {identity}: {message}")]
    Serialization { identity: String, message: String },
}

/// Filesystem errors
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// Failed to create a directory (including ancestors)
    #[error("Failed to create directory {}: {message}", path.display())]
    CreateDir { path: PathBuf, message: String },

    /// Failed to write a file
    #[error("Failed to write file {}: {message}", path.display())]
    WriteFile { path: PathBuf, message: String },

    /// Failed to read a file
    #[error("Failed to read file {}: {message}", path.display())]
    ReadFile { path: PathBuf, message: String },
}

impl From<std::io::Error> for HarvestError {
    fn from(err: std::io::Error) -> Self {
        HarvestError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        HarvestError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for HarvestError {
    fn from(err: toml::de::Error) -> Self {
        HarvestError::Configuration(format!("TOML parse error: {err}"))
    }
}
