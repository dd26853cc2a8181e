//! Aadhaar enrolment dashboard
//!
//! A view-state controller over the enrolment analytics API: region
//! selection, per-region statistics, anomaly hotspots, demand forecasts and
//! a local what-if allocation of enrolment centers. Text rendering and a
//! line-oriented session sit on top for the command-line front end.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod controller;
pub mod error;
pub mod render;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use controller::DashboardController;
pub use error::{DashboardError, Result};
pub use session::{Session, SessionCommand};
pub use state::{AccessGate, DashboardState, Slot, Summary};

use aadhaar_client::ApiClient;
use aadhaar_core::Config;

/// Build a controller from configuration
///
/// # Errors
///
/// Returns [`DashboardError`] if:
/// - The base URL is invalid or the HTTP client cannot be built
/// - The configured starting capacity is zero
pub fn init_with_config(config: &Config) -> Result<DashboardController> {
    let client = ApiClient::from_config(&config.api)?;
    let capacity = config.capacity.initial()?;
    Ok(DashboardController::with_client(client, capacity))
}
