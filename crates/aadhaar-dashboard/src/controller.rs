//! Dashboard controller
//!
//! Owns the [`DashboardState`] and drives the backend. Each fetch takes a
//! sequence number from its slot's counter when it is issued; the response
//! is applied only if no newer one has landed in the meantime.

use crate::error::{DashboardError, Result};
use crate::state::{DashboardState, Summary};
use aadhaar_client::{ApiClient, ClientError, DashboardApi};
use aadhaar_core::{
    ALL_DISTRICTS, AllocationEntry, Capacity, DetailedStats, ForecastPoint, Hotspot,
    RegionDirectory, Selection,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Default)]
struct Sequences {
    directory: AtomicU64,
    hotspots: AtomicU64,
    stats: AtomicU64,
    forecast: AtomicU64,
}

fn next(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed) + 1
}

/// Fetches issued for one selection
#[derive(Debug)]
struct PendingRefresh {
    selection: Selection,
    stats_seq: u64,
    forecast_seq: Option<u64>,
}

/// Drives the dashboard: loads data, tracks the selection, derives figures
#[derive(Clone)]
pub struct DashboardController {
    api: Arc<dyn DashboardApi>,
    state: Arc<RwLock<DashboardState>>,
    sequences: Arc<Sequences>,
}

impl fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardController")
            .field("selection", &self.state.read().selection)
            .finish_non_exhaustive()
    }
}

impl DashboardController {
    /// Create a controller over any backend implementation
    pub fn new(api: Arc<dyn DashboardApi>, capacity: Capacity) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(DashboardState::with_capacity(capacity))),
            sequences: Arc::new(Sequences::default()),
        }
    }

    /// Create a controller talking HTTP through `client`
    #[must_use]
    pub fn with_client(client: ApiClient, capacity: Capacity) -> Self {
        Self::new(Arc::new(client), capacity)
    }

    /// Copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Read the state without cloning it
    pub fn with_state<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.state.read())
    }

    /// Load the region directory and hotspot list concurrently
    ///
    /// Each list is stored as soon as its own response arrives. A hotspot
    /// failure is logged and the list stays empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory request fails; hotspots that did
    /// arrive are still stored.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        let directory_seq = next(&self.sequences.directory);
        let hotspots_seq = next(&self.sequences.hotspots);

        let directory = async {
            let directory = self.api.init_data().await?;
            self.store_directory(directory_seq, directory);
            Ok::<(), ClientError>(())
        };
        let hotspots = async {
            match self.api.top_anomalies().await {
                Ok(list) => self.store_hotspots(hotspots_seq, list),
                Err(e) => error!(error = %e, "Failed to load hotspots"),
            }
        };

        let (directory, ()) = tokio::join!(directory, hotspots);
        directory?;
        Ok(())
    }

    /// Make `(state, district)` current and refresh its data
    ///
    /// Statistics are always fetched. The forecast is fetched only for a
    /// concrete district; on `"All"` the previous forecast is kept.
    ///
    /// # Errors
    ///
    /// Returns the first request error. Slots whose request failed keep
    /// their previous values.
    pub async fn select_region(&self, state: &str, district: &str) -> Result<()> {
        let pending = self.begin_refresh(state, district);
        self.complete_refresh(pending).await
    }

    /// Same as [`select_region`](Self::select_region), with the fetches
    /// running on a background task
    ///
    /// The selection and request order are fixed before this returns.
    pub fn spawn_select_region(&self, state: &str, district: &str) -> JoinHandle<Result<()>> {
        let pending = self.begin_refresh(state, district);
        let this = self.clone();
        tokio::spawn(async move { this.complete_refresh(pending).await })
    }

    /// Choose a state: its districts become the options and the selection
    /// becomes `(state, "All")`
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics request fails.
    pub async fn select_state(&self, state: &str) -> Result<()> {
        self.select_region(state, ALL_DISTRICTS).await
    }

    /// Choose a district within the selected state
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoStateSelected`] when no state is chosen,
    /// or the first request error.
    pub async fn select_district(&self, district: &str) -> Result<()> {
        let state = self.state.read().selection.state.clone();
        if state.is_empty() {
            return Err(DashboardError::NoStateSelected);
        }
        self.select_region(&state, district).await
    }

    /// Set the capacity per center; the allocation follows immediately
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is zero.
    pub fn set_capacity(&self, value: u32) -> Result<Capacity> {
        let capacity = Capacity::new(value)?;
        self.state.write().capacity = capacity;
        debug!(%capacity, "Capacity changed");
        Ok(capacity)
    }

    /// What-if allocation for the current forecast and capacity
    #[must_use]
    pub fn allocation(&self) -> Vec<AllocationEntry> {
        self.state.read().allocation()
    }

    /// KPI figures for the current state
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.state.read().summary()
    }

    /// Show the dashboard view
    pub fn log_in(&self) {
        self.state.write().gate.log_in();
        info!("Logged in");
    }

    /// Return to the login view; loaded data is kept
    pub fn log_out(&self) {
        self.state.write().gate.log_out();
        info!("Logged out");
    }

    /// Whether the dashboard view is shown
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state.read().gate.is_logged_in()
    }

    fn begin_refresh(&self, state: &str, district: &str) -> PendingRefresh {
        let selection = Selection::new(state, district);
        info!(%selection, "Selection changed");
        self.state.write().select(selection.clone());

        let stats_seq = next(&self.sequences.stats);
        let forecast_seq = selection
            .is_district()
            .then(|| next(&self.sequences.forecast));

        PendingRefresh {
            selection,
            stats_seq,
            forecast_seq,
        }
    }

    async fn complete_refresh(&self, pending: PendingRefresh) -> Result<()> {
        let PendingRefresh {
            selection,
            stats_seq,
            forecast_seq,
        } = pending;
        let (state, district) = (selection.state.as_str(), selection.district.as_str());

        let stats = async {
            let value = self
                .api
                .detailed_analysis(state, district)
                .await
                .inspect_err(|e| warn!(%selection, error = %e, "Statistics request failed"))?;
            self.store_stats(&selection, stats_seq, value);
            Ok::<(), ClientError>(())
        };
        let forecast = async {
            let Some(seq) = forecast_seq else {
                return Ok(());
            };
            let points = self
                .api
                .forecast(state, district)
                .await
                .inspect_err(|e| warn!(%selection, error = %e, "Forecast request failed"))?;
            self.store_forecast(&selection, seq, points);
            Ok::<(), ClientError>(())
        };

        let (stats, forecast) = tokio::join!(stats, forecast);
        stats?;
        forecast?;
        Ok(())
    }

    fn store_directory(&self, seq: u64, directory: RegionDirectory) {
        info!(
            states = directory.states.len(),
            districts = directory.district_count(),
            "Region directory loaded"
        );
        let mut state = self.state.write();
        if state.directory.apply(seq, directory) {
            let selected = state.selection.state.clone();
            state.districts = state.directory.value().districts(&selected).to_vec();
        }
    }

    fn store_hotspots(&self, seq: u64, hotspots: Vec<Hotspot>) {
        info!(count = hotspots.len(), "Hotspots loaded");
        self.state.write().hotspots.apply(seq, hotspots);
    }

    fn store_stats(&self, selection: &Selection, seq: u64, stats: DetailedStats) {
        if !self.state.write().stats.apply(seq, stats) {
            warn!(%selection, seq, "Discarded stale statistics");
        }
    }

    fn store_forecast(&self, selection: &Selection, seq: u64, points: Vec<ForecastPoint>) {
        if !self.state.write().forecast.apply(seq, points) {
            warn!(%selection, seq, "Discarded stale forecast");
        }
    }
}
