//! Dashboard state record
//!
//! Everything the views read lives in [`DashboardState`]. Fetched values sit
//! in [`Slot`]s that remember the sequence number of the request whose
//! response they hold, so a late response for an older selection can never
//! overwrite data for a newer one.

use aadhaar_core::allocation::{optimal_centers, peak_centers, spike_risk_days};
use aadhaar_core::{
    AllocationEntry, Capacity, Day, DetailedStats, ForecastPoint, Hotspot, RegionDirectory,
    Selection, derive_allocation,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched value tagged with the request that produced it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot<T> {
    value: T,
    applied_seq: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl<T> Slot<T> {
    /// Create a slot holding an initial value
    pub const fn new(value: T) -> Self {
        Self {
            value,
            applied_seq: 0,
            updated_at: None,
        }
    }

    /// Current value
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Sequence number of the response currently held, 0 if never filled
    pub const fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    /// When the current value arrived
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Whether any response has been applied
    pub const fn is_loaded(&self) -> bool {
        self.applied_seq > 0
    }

    /// Store `value` if `seq` is newer than what the slot holds
    ///
    /// Returns `false` and leaves the slot untouched for stale responses.
    pub fn apply(&mut self, seq: u64, value: T) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.value = value;
        self.applied_seq = seq;
        self.updated_at = Some(Utc::now());
        true
    }
}

/// Local login toggle
///
/// Purely cosmetic: no credential exists and requests are never
/// authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGate {
    logged_in: bool,
}

impl AccessGate {
    /// Open the dashboard view
    pub const fn log_in(&mut self) {
        self.logged_in = true;
    }

    /// Return to the login view
    pub const fn log_out(&mut self) {
        self.logged_in = false;
    }

    /// Whether the dashboard view is shown
    pub const fn is_logged_in(self) -> bool {
        self.logged_in
    }
}

/// Full dashboard state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Login toggle
    pub gate: AccessGate,
    /// State to districts directory
    pub directory: Slot<RegionDirectory>,
    /// District options for the selected state
    pub districts: Vec<String>,
    /// Current selection
    pub selection: Selection,
    /// Statistics for the current selection
    pub stats: Slot<DetailedStats>,
    /// Hotspot list, empty until loaded
    pub hotspots: Slot<Vec<Hotspot>>,
    /// Forecast for the last district that returned one
    pub forecast: Slot<Vec<ForecastPoint>>,
    /// Capacity per center for the what-if allocation
    pub capacity: Capacity,
}

impl DashboardState {
    /// Create an empty state with the given starting capacity
    #[must_use]
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Make `selection` current
    ///
    /// Choosing a new state refreshes the district options from the
    /// directory. Stats and forecast are left alone until responses arrive.
    pub fn select(&mut self, selection: Selection) {
        if selection.state != self.selection.state {
            self.districts = self.directory.value().districts(&selection.state).to_vec();
        }
        self.selection = selection;
    }

    /// What-if allocation for the current forecast and capacity
    #[must_use]
    pub fn allocation(&self) -> Vec<AllocationEntry> {
        derive_allocation(self.forecast.value(), self.capacity)
    }

    /// Figures shown on the KPI cards
    #[must_use]
    pub fn summary(&self) -> Summary {
        let stats = self.stats.value();
        let allocation = self.allocation();

        Summary {
            selection: self.selection.clone(),
            total_history: stats.total_or_zero(),
            average: stats.avg_or_zero(),
            detected_spikes: stats.anomaly_count_or_zero(),
            spikes_flagged: stats.has_spikes(),
            capacity: self.capacity,
            optimal_centers: optimal_centers(&allocation),
            peak_centers: peak_centers(&allocation),
            spike_risk_days: spike_risk_days(self.forecast.value())
                .into_iter()
                .map(|point| point.day.clone())
                .collect(),
        }
    }
}

/// Derived KPI figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Selection the figures describe
    pub selection: Selection,
    /// Historical enrolment total, 0 when unknown
    pub total_history: f64,
    /// Historical average, 0 when unknown
    pub average: f64,
    /// Number of detected spikes
    pub detected_spikes: u64,
    /// Whether spikes should be highlighted
    pub spikes_flagged: bool,
    /// Capacity per center
    pub capacity: Capacity,
    /// Centers needed on the first forecast day
    pub optimal_centers: u64,
    /// Largest daily center requirement
    pub peak_centers: u64,
    /// Forecast days above the spike-risk threshold
    pub spike_risk_days: Vec<Day>,
}
