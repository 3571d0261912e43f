//! Error types for the bridge layer.
//!
//! Every failure that reaches the IPC boundary is an [`ApiError`], and is reduced
//! to a `{kind, message}` pair there. Remote failures start life as a
//! [`FetchError`] so that callers which degrade (stale cache, empty catalog) do
//! so explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure of an opaque remote call (catalog source, budget gateway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// Remote answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The background task driving the fetch did not complete.
    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Bridge API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Remote fetch failed: {0}")]
    RemoteFetchFailure(#[from] FetchError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Settings persistence failed: {0}")]
    PersistenceFailure(String),

    #[error("Handler already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid payload for {operation}: {reason}")]
    InvalidPayload { operation: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A handler produced a result that could not be encoded for the response.
    #[error("Failed to encode result: {0}")]
    EncodeFailure(String),
}

impl ApiError {
    /// Classification carried across the IPC boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::RemoteFetchFailure(_) => ErrorKind::RemoteFetchFailure,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::PersistenceFailure(_) => ErrorKind::PersistenceFailure,
            ApiError::DuplicateRegistration(_) => ErrorKind::DuplicateRegistration,
            ApiError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            ApiError::InvalidPayload { .. } => ErrorKind::InvalidPayload,
            ApiError::ConfigError(_) => ErrorKind::ConfigError,
            ApiError::EncodeFailure(_) => ErrorKind::EncodeFailure,
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid_payload(operation: &str, reason: impl fmt::Display) -> Self {
        ApiError::InvalidPayload {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Error classification exposed to the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    RemoteFetchFailure,
    NotFound,
    PersistenceFailure,
    DuplicateRegistration,
    UnknownOperation,
    InvalidPayload,
    ConfigError,
    EncodeFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RemoteFetchFailure => "RemoteFetchFailure",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PersistenceFailure => "PersistenceFailure",
            ErrorKind::DuplicateRegistration => "DuplicateRegistration",
            ErrorKind::UnknownOperation => "UnknownOperation",
            ErrorKind::InvalidPayload => "InvalidPayload",
            ErrorKind::ConfigError => "ConfigError",
            ErrorKind::EncodeFailure => "EncodeFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
