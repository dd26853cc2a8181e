//! Error types for the dashboard controller and front end

use aadhaar_client::ClientError;
use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors surfaced by the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Backend request failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Configuration or validation failure
    #[error(transparent)]
    Core(#[from] aadhaar_core::Error),

    /// A district was chosen before any state
    #[error("No state selected; choose a state before a district")]
    NoStateSelected,

    /// Name not offered by the region directory
    #[error("Unknown {kind} '{name}'")]
    UnknownRegion {
        /// "state" or "district"
        kind: &'static str,
        /// Rejected name
        name: String,
    },

    /// Session input that does not parse
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Background refresh task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DashboardError {
    /// Create an unknown-state error
    #[must_use]
    pub fn unknown_state<S: Into<String>>(name: S) -> Self {
        Self::UnknownRegion {
            kind: "state",
            name: name.into(),
        }
    }

    /// Create an unknown-district error
    #[must_use]
    pub fn unknown_district<S: Into<String>>(name: S) -> Self {
        Self::UnknownRegion {
            kind: "district",
            name: name.into(),
        }
    }
}
