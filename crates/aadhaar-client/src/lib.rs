//! Client for the Aadhaar enrolment analytics API
//!
//! Wraps the four `GET` endpoints the dashboard depends on. Requests carry
//! no authentication and are never retried.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod endpoint;
pub mod error;

pub use api_client::{ApiClient, DashboardApi};
pub use endpoint::Endpoint;
pub use error::{ClientError, ClientResult};
