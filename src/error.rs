//! Error handling for the fleet client

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message surfaced to the user when no response was received.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// A single field-level validation problem reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field, when the backend names one
    #[serde(default, alias = "param", alias = "path")]
    pub field: Option<String>,

    /// Human readable message
    #[serde(alias = "msg")]
    pub message: String,
}

/// Unified error type for the fleet client
#[derive(Error, Debug)]
pub enum Error {
    /// The backend answered 401; the session has already been cleared
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Non-2xx answer from the backend
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    /// No response received (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Persisted session storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The response envelope did not have the expected shape
    #[error("Envelope error: {0}")]
    Envelope(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new envelope error
    pub fn envelope<T: fmt::Display>(msg: T) -> Self {
        Error::Envelope(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// HTTP status of the failed call, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::Api { status, .. } => Some(*status),
            Error::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error invalidated the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// The text a form or page should show for this error.
    ///
    /// Validation errors are concatenated; transport failures collapse to a
    /// generic connection message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthorized { message } => message.clone(),
            Error::Api { message, errors, .. } if !errors.is_empty() => {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if message.is_empty() {
                    joined
                } else {
                    format!("{}: {}", message, joined)
                }
            }
            Error::Api { message, .. } => message.clone(),
            Error::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
