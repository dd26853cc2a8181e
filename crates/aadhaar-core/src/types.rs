//! Data types exchanged with the enrolment analytics API

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// District sentinel meaning "the whole state"
pub const ALL_DISTRICTS: &str = "All";

/// Demand level above which a forecast day counts as a spike risk
pub const SPIKE_RISK_THRESHOLD: f64 = 1200.0;

/// State name → ordered district names, as served by `/api/init-data`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDirectory {
    /// State names in display order
    #[serde(default)]
    pub states: Vec<String>,

    /// Districts of each state
    #[serde(default)]
    pub map: IndexMap<String, Vec<String>>,
}

impl RegionDirectory {
    /// Districts of `state`, empty when the state is unknown
    #[must_use]
    pub fn districts(&self, state: &str) -> &[String] {
        self.map.get(state).map_or(&[], Vec::as_slice)
    }

    /// Whether the directory holds no states at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.map.is_empty()
    }

    /// Total number of districts across every state
    #[must_use]
    pub fn district_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}

/// The (state, district) pair that drives data fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected state, empty until the operator picks one
    pub state: String,

    /// Selected district or [`ALL_DISTRICTS`]
    pub district: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            state: String::new(),
            district: ALL_DISTRICTS.to_string(),
        }
    }
}

impl Selection {
    /// Create a selection
    pub fn new(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
        }
    }

    /// State-level selection (`district = "All"`)
    pub fn whole_state(state: impl Into<String>) -> Self {
        Self::new(state, ALL_DISTRICTS)
    }

    /// Whether a concrete district (not the sentinel) is selected
    #[must_use]
    pub fn is_district(&self) -> bool {
        self.district != ALL_DISTRICTS
    }

    /// Whether any state has been chosen yet
    #[must_use]
    pub fn has_state(&self) -> bool {
        !self.state.is_empty()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.district, self.state)
    }
}

/// Statistics served by `/api/detailed-analysis`
///
/// Numeric fields stay optional; the zero default is applied where the
/// figures are read for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedStats {
    /// Total historical enrolments
    #[serde(default)]
    pub total: Option<f64>,

    /// Average enrolments
    #[serde(default)]
    pub avg: Option<f64>,

    /// Number of detected anomalies; JSON numbers such as `3.0` are accepted
    #[serde(default)]
    pub anomaly_count: Option<f64>,

    /// Raw anomaly records, shape owned by the backend; `null` reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub anomaly_list: Vec<serde_json::Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl DetailedStats {
    /// Total, 0 when missing
    #[must_use]
    pub fn total_or_zero(&self) -> f64 {
        self.total.unwrap_or_default()
    }

    /// Average, 0 when missing
    #[must_use]
    pub fn avg_or_zero(&self) -> f64 {
        self.avg.unwrap_or_default()
    }

    /// Anomaly count rounded to a whole number, 0 when missing or negative
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn anomaly_count_or_zero(&self) -> u64 {
        match self.anomaly_count {
            Some(count) if count.is_finite() && count > 0.0 => count.round() as u64,
            _ => 0,
        }
    }

    /// Whether the selection shows detected spikes
    #[must_use]
    pub fn has_spikes(&self) -> bool {
        self.anomaly_count.is_some_and(|count| count > 0.0)
    }
}

/// A district flagged by the backend's anomaly scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// District name
    pub district: String,

    /// Z-score of the anomaly
    pub score: f64,

    /// Observed value
    pub val: f64,
}

/// Forecast day label; the backend sends either a name or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Day {
    /// Whole day offset or ordinal
    Index(i64),
    /// Non-integer JSON number such as `1.0` or `1.5`
    Number(f64),
    /// Day name such as `"Mon"`
    Label(String),
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<&str> for Day {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<i64> for Day {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

/// One day of predicted demand from `/api/forecast`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Day label
    pub day: Day,

    /// Predicted enrolment demand
    pub demand: f64,
}

impl ForecastPoint {
    /// Create a forecast point
    pub fn new(day: impl Into<Day>, demand: f64) -> Self {
        Self {
            day: day.into(),
            demand,
        }
    }

    /// Whether demand is above the spike-risk reference line
    #[must_use]
    pub fn is_spike_risk(&self) -> bool {
        self.demand > SPIKE_RISK_THRESHOLD
    }
}

/// Enrolments a single center handles, never zero
///
/// The operator control keeps it within [`Capacity::MIN`]..=[`Capacity::MAX`]
/// in steps of [`Capacity::STEP`], but programmatic values outside that range
/// are accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(NonZeroU32);

impl Capacity {
    /// Lower bound of the operator control
    pub const MIN: u32 = 100;
    /// Upper bound of the operator control
    pub const MAX: u32 = 2000;
    /// Increment of the operator control
    pub const STEP: u32 = 50;
    /// Initial capacity
    pub const DEFAULT: u32 = 500;

    /// Create a capacity
    ///
    /// # Errors
    ///
    /// Returns a validation error when `value` is zero.
    pub fn new(value: u32) -> crate::Result<Self> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| crate::Error::validation("capacity", "must be greater than zero"))
    }

    /// Raw value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(NonZeroU32::MIN.saturating_add(Self::DEFAULT - 1))
    }
}

impl TryFrom<u32> for Capacity {
    type Error = crate::Error;

    fn try_from(value: u32) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.get()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Forecast day with the number of centers needed at the current capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Day label
    pub day: Day,

    /// Predicted demand
    pub demand: f64,

    /// Centers required, `ceil(demand / capacity)`
    pub centers: u64,
}
