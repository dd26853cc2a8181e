//! HTTP client for communicating with the enrolment analytics API

use crate::endpoint::{Endpoint, region_url};
use crate::error::{ClientError, ClientResult};
use aadhaar_core::config::ApiConfig;
use aadhaar_core::{DetailedStats, ForecastPoint, Hotspot, RegionDirectory};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// The analytics backend as seen by the dashboard
///
/// [`ApiClient`] talks HTTP; tests and offline tooling can provide their
/// own implementation.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch the state → districts directory
    async fn init_data(&self) -> ClientResult<RegionDirectory>;

    /// Fetch the anomaly hotspot list
    async fn top_anomalies(&self) -> ClientResult<Vec<Hotspot>>;

    /// Fetch statistics for a state or one of its districts
    async fn detailed_analysis(&self, state: &str, district: &str) -> ClientResult<DetailedStats>;

    /// Fetch the demand forecast for a district
    async fn forecast(&self, state: &str, district: &str) -> ClientResult<Vec<ForecastPoint>>;
}

/// API client for making HTTP requests to the analytics server
///
/// No credentials of any kind are attached to requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with default transport settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        reqwest::Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(ClientError::Builder)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    /// Base origin requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the region directory
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_init_data(&self) -> ClientResult<RegionDirectory> {
        let url = format!("{}{}", self.base_url, Endpoint::InitData.path());
        self.get_json(Endpoint::InitData, &url).await
    }

    /// Get the anomaly hotspots; a `null` body reads as an empty list
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_top_anomalies(&self) -> ClientResult<Vec<Hotspot>> {
        let url = format!("{}{}", self.base_url, Endpoint::TopAnomalies.path());
        let hotspots: Option<Vec<Hotspot>> = self.get_json(Endpoint::TopAnomalies, &url).await?;
        Ok(hotspots.unwrap_or_default())
    }

    /// Get detailed statistics for `(state, district)`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_detailed_analysis(
        &self,
        state: &str,
        district: &str,
    ) -> ClientResult<DetailedStats> {
        let url = region_url(&self.base_url, Endpoint::DetailedAnalysis, state, district);
        self.get_json(Endpoint::DetailedAnalysis, &url).await
    }

    /// Get the demand forecast for `(state, district)`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_forecast(&self, state: &str, district: &str) -> ClientResult<Vec<ForecastPoint>> {
        let url = region_url(&self.base_url, Endpoint::Forecast, state, district);
        self.get_json(Endpoint::Forecast, &url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint, url: &str) -> ClientResult<T> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Request { endpoint, source })?;

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { endpoint, source })
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn init_data(&self) -> ClientResult<RegionDirectory> {
        self.get_init_data().await
    }

    async fn top_anomalies(&self) -> ClientResult<Vec<Hotspot>> {
        self.get_top_anomalies().await
    }

    async fn detailed_analysis(&self, state: &str, district: &str) -> ClientResult<DetailedStats> {
        self.get_detailed_analysis(state, district).await
    }

    async fn forecast(&self, state: &str, district: &str) -> ClientResult<Vec<ForecastPoint>> {
        self.get_forecast(state, district).await
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
