//! Plain-text views of the dashboard

use crate::state::{DashboardState, Summary};
use aadhaar_core::utils::{format_count, format_score};
use aadhaar_core::{AllocationEntry, Capacity, Hotspot, RegionDirectory};
use std::fmt;

/// Shown while the hotspot list is empty
pub const HOTSPOT_PLACEHOLDER: &str = "Scanning Data...";

/// Hotspot leaderboard in server order
#[derive(Debug, Clone, Copy)]
pub struct HotspotList<'a>(pub &'a [Hotspot]);

impl fmt::Display for HotspotList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Anomaly hotspots")?;
        if self.0.is_empty() {
            return writeln!(f, "  {HOTSPOT_PLACEHOLDER}");
        }
        for (rank, hotspot) in self.0.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}. {:<24} score {:>7}  value {}",
                rank + 1,
                hotspot.district,
                format_score(hotspot.score),
                format_count(hotspot.val)
            )?;
        }
        Ok(())
    }
}

/// KPI cards
#[derive(Debug, Clone, Copy)]
pub struct SummaryCard<'a>(pub &'a Summary);

impl fmt::Display for SummaryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        let region = if summary.selection.has_state() {
            summary.selection.to_string()
        } else {
            "No state selected".to_string()
        };

        writeln!(f, "Region: {region}")?;
        writeln!(f, "  Total history     {}", format_count(summary.total_history))?;
        writeln!(f, "  Daily average     {}", format_count(summary.average))?;
        writeln!(
            f,
            "  Optimal centers   {} (capacity {}/center)",
            summary.optimal_centers, summary.capacity
        )?;
        let marker = if summary.spikes_flagged { "  [!]" } else { "" };
        writeln!(f, "  Detected spikes   {}{marker}", summary.detected_spikes)?;

        if !summary.spike_risk_days.is_empty() {
            let days: Vec<String> = summary.spike_risk_days.iter().map(ToString::to_string).collect();
            writeln!(f, "  Spike risk days   {}", days.join(", "))?;
        }
        Ok(())
    }
}

/// Per-day what-if allocation table
#[derive(Debug, Clone, Copy)]
pub struct AllocationTable<'a> {
    /// Derived allocation rows
    pub entries: &'a [AllocationEntry],
    /// Capacity the rows were derived with
    pub capacity: Capacity,
}

impl fmt::Display for AllocationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Center allocation at {} per center", self.capacity)?;
        if self.entries.is_empty() {
            return writeln!(f, "  No forecast loaded; select a district");
        }
        writeln!(f, "  {:<10} {:>12} {:>8}", "Day", "Demand", "Centers")?;
        for entry in self.entries {
            writeln!(
                f,
                "  {:<10} {:>12} {:>8}",
                entry.day.to_string(),
                format_count(entry.demand),
                entry.centers
            )?;
        }
        Ok(())
    }
}

/// State list, or one state's districts
#[derive(Debug, Clone, Copy)]
pub struct RegionListing<'a> {
    /// Loaded directory
    pub directory: &'a RegionDirectory,
    /// Restrict the listing to this state
    pub state: Option<&'a str>,
}

impl fmt::Display for RegionListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            Some(state) => {
                writeln!(f, "{state}")?;
                for district in self.directory.districts(state) {
                    writeln!(f, "  {district}")?;
                }
            }
            None => {
                for state in &self.directory.states {
                    writeln!(f, "{state} ({})", self.directory.districts(state).len())?;
                }
            }
        }
        Ok(())
    }
}

/// Whole dashboard screen, or the login prompt when logged out
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a>(pub &'a DashboardState);

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        if !state.gate.is_logged_in() {
            return writeln!(f, "Access portal locked. Type `login` to enter.");
        }

        write!(f, "{}", SummaryCard(&state.summary()))?;
        writeln!(f)?;
        if state.selection.is_district() || !state.forecast.value().is_empty() {
            let entries = state.allocation();
            write!(
                f,
                "{}",
                AllocationTable {
                    entries: &entries,
                    capacity: state.capacity,
                }
            )?;
            writeln!(f)?;
        }
        write!(f, "{}", HotspotList(state.hotspots.value()))
    }
}
