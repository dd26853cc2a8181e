//! Error types for the analytics API client

use crate::endpoint::Endpoint;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the analytics API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, timeout)
    #[error("Failed to fetch {endpoint}: {source}")]
    Request {
        /// Endpoint being fetched
        endpoint: Endpoint,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("API returned error for {endpoint}: {status}")]
    Status {
        /// Endpoint being fetched
        endpoint: Endpoint,
        /// HTTP status code
        status: u16,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        /// Endpoint being fetched
        endpoint: Endpoint,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Configured base origin is not a valid URL
    #[error("Invalid API base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// Rejected URL
        url: String,
        /// Parser message
        message: String,
    },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Builder(#[source] reqwest::Error),
}

impl ClientError {
    /// Endpoint the failure belongs to, if any
    #[must_use]
    pub const fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            Self::InvalidBaseUrl { .. } | Self::Builder(_) => None,
        }
    }
}
