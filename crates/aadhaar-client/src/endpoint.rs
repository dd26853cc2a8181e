//! The four analytics endpoints

use std::fmt;

/// Backend endpoint, all `GET` with JSON bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Region directory
    InitData,
    /// Anomaly hotspot list
    TopAnomalies,
    /// Statistics for a selection
    DetailedAnalysis,
    /// Demand forecast for a district
    Forecast,
}

impl Endpoint {
    /// Path relative to the base origin
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::InitData => "/api/init-data",
            Self::TopAnomalies => "/api/top-anomalies",
            Self::DetailedAnalysis => "/api/detailed-analysis",
            Self::Forecast => "/api/forecast",
        }
    }

    /// Whether the endpoint takes `state` and `district` query parameters
    #[must_use]
    pub const fn takes_region(self) -> bool {
        matches!(self, Self::DetailedAnalysis | Self::Forecast)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Build `{base}{path}?state=..&district=..` with percent-encoded values
#[must_use]
pub fn region_url(base_url: &str, endpoint: Endpoint, state: &str, district: &str) -> String {
    format!(
        "{base_url}{}?state={}&district={}",
        endpoint.path(),
        urlencoding::encode(state),
        urlencoding::encode(district)
    )
}
