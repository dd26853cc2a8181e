//! What-if center allocation derived from a demand forecast
//!
//! Everything here is pure: the dashboard recomputes the allocation whenever
//! the forecast or the capacity changes and never stores the result.

use crate::types::{AllocationEntry, Capacity, ForecastPoint, SPIKE_RISK_THRESHOLD};

/// Centers needed to serve `demand` enrolments, `ceil(demand / capacity)`
///
/// Zero, negative and non-finite demand need no centers.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn centers_for(demand: f64, capacity: Capacity) -> u64 {
    if !demand.is_finite() || demand <= 0.0 {
        return 0;
    }
    (demand / f64::from(capacity.get())).ceil() as u64
}

/// Allocation for every forecast day, in forecast order
#[must_use]
pub fn derive_allocation(forecast: &[ForecastPoint], capacity: Capacity) -> Vec<AllocationEntry> {
    forecast
        .iter()
        .map(|point| AllocationEntry {
            day: point.day.clone(),
            demand: point.demand,
            centers: centers_for(point.demand, capacity),
        })
        .collect()
}

/// Centers for the first forecast day, 0 without a forecast
#[must_use]
pub fn optimal_centers(allocation: &[AllocationEntry]) -> u64 {
    allocation.first().map_or(0, |entry| entry.centers)
}

/// Peak center requirement over the forecast horizon
#[must_use]
pub fn peak_centers(allocation: &[AllocationEntry]) -> u64 {
    allocation.iter().map(|entry| entry.centers).max().unwrap_or(0)
}

/// Forecast days whose demand crosses the spike-risk reference line
#[must_use]
pub fn spike_risk_days(forecast: &[ForecastPoint]) -> Vec<&ForecastPoint> {
    forecast
        .iter()
        .filter(|point| point.demand > SPIKE_RISK_THRESHOLD)
        .collect()
}
