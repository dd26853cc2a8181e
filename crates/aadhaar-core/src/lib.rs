//! Core types and utilities for the Aadhaar enrolment dashboard
//!
//! Holds the wire types of the analytics API, the dashboard configuration,
//! the shared error type and the pure what-if allocation math.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod allocation;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use allocation::{centers_for, derive_allocation};
pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    ALL_DISTRICTS, AllocationEntry, Capacity, Day, DetailedStats, ForecastPoint, Hotspot,
    RegionDirectory, Selection,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level`. `json` selects structured
/// output, otherwise the pretty formatter is used.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_exports() {
        let _config = Config::default();
        let _selection = Selection::default();
        let _error = Error::configuration("test");
        assert_eq!(ALL_DISTRICTS, "All");
    }

    #[test]
    fn test_init_logging_twice_fails() {
        let first = init_logging("debug", false);
        let second = init_logging("debug", true);

        // Another test may have installed the subscriber first
        assert!(first.is_err() || second.is_err());
    }
}
