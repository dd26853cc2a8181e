//! Scripted in-memory backend shared by the integration tests

#![allow(dead_code, clippy::unwrap_used)]

use aadhaar_client::{ClientError, ClientResult, DashboardApi, Endpoint};
use aadhaar_core::{DetailedStats, ForecastPoint, Hotspot, RegionDirectory};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

/// One recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub state: String,
    pub district: String,
}

/// Backend that answers from fixed data and records every request
///
/// Requests for a held district block until [`ScriptedApi::release`] is
/// called, which lets tests choose the completion order.
#[derive(Default)]
pub struct ScriptedApi {
    directory: RegionDirectory,
    hotspots: Vec<Hotspot>,
    stats: HashMap<(String, String), DetailedStats>,
    forecasts: HashMap<(String, String), Vec<ForecastPoint>>,
    fail_directory: AtomicBool,
    fail_hotspots: AtomicBool,
    fail_stats: AtomicBool,
    fail_forecast: AtomicBool,
    stall_directory: AtomicBool,
    stall_forecast: AtomicBool,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    /// Maharashtra and Kerala with Pune and Nagpur forecasts
    pub fn maharashtra() -> Self {
        let mut map = IndexMap::new();
        map.insert(
            "Maharashtra".to_string(),
            vec!["Pune".to_string(), "Nagpur".to_string()],
        );
        map.insert("Kerala".to_string(), vec!["Kochi".to_string()]);

        let mut api = Self {
            directory: RegionDirectory {
                states: vec!["Maharashtra".to_string(), "Kerala".to_string()],
                map,
            },
            hotspots: vec![
                hotspot("Thane", 5.1, 21_000.0),
                hotspot("Patna", 4.4, 17_000.0),
                hotspot("Surat", 3.9, 15_500.0),
            ],
            ..Self::default()
        };

        api.insert_stats("Maharashtra", "All", stats(2_400_000.0, 3));
        api.insert_stats("Maharashtra", "Pune", stats(150_000.0, 2));
        api.insert_stats("Maharashtra", "Nagpur", stats(90_000.0, 0));
        api.insert_stats("Kerala", "All", stats(800_000.0, 1));
        api.insert_forecast(
            "Maharashtra",
            "Pune",
            vec![ForecastPoint::new("Mon", 1000.0), ForecastPoint::new("Tue", 1500.0)],
        );
        api.insert_forecast(
            "Maharashtra",
            "Nagpur",
            vec![ForecastPoint::new("Mon", 400.0), ForecastPoint::new("Tue", 650.0)],
        );
        api
    }

    pub fn insert_stats(&mut self, state: &str, district: &str, stats: DetailedStats) {
        self.stats
            .insert((state.to_string(), district.to_string()), stats);
    }

    pub fn insert_forecast(&mut self, state: &str, district: &str, points: Vec<ForecastPoint>) {
        self.forecasts
            .insert((state.to_string(), district.to_string()), points);
    }

    pub fn fail_hotspots(&self) {
        self.fail_hotspots.store(true, Ordering::SeqCst);
    }

    pub fn fail_directory(&self) {
        self.fail_directory.store(true, Ordering::SeqCst);
    }

    pub fn fail_stats(&self, fail: bool) {
        self.fail_stats.store(fail, Ordering::SeqCst);
    }

    pub fn fail_forecast(&self, fail: bool) {
        self.fail_forecast.store(fail, Ordering::SeqCst);
    }

    /// Make directory requests never complete
    pub fn stall_directory(&self) {
        self.stall_directory.store(true, Ordering::SeqCst);
    }

    /// Make forecast requests never complete
    pub fn stall_forecast(&self) {
        self.stall_forecast.store(true, Ordering::SeqCst);
    }

    /// Block stats and forecast requests for `district` until released
    pub fn hold(&self, district: &str) {
        self.gates
            .lock()
            .insert(district.to_string(), Arc::new(Semaphore::new(0)));
    }

    /// Let every held request for `district` complete
    pub fn release(&self, district: &str) {
        if let Some(gate) = self.gates.lock().get(district) {
            gate.add_permits(64);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    fn record(&self, endpoint: Endpoint, state: &str, district: &str) {
        self.calls.lock().push(Call {
            endpoint,
            state: state.to_string(),
            district: district.to_string(),
        });
    }

    async fn wait_for(&self, district: &str) {
        let gate = self.gates.lock().get(district).cloned();
        if let Some(gate) = gate {
            drop(gate.acquire().await.unwrap());
        }
    }
}

#[async_trait]
impl DashboardApi for ScriptedApi {
    async fn init_data(&self) -> ClientResult<RegionDirectory> {
        self.record(Endpoint::InitData, "", "");
        if self.stall_directory.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_directory.load(Ordering::SeqCst) {
            return Err(unavailable(Endpoint::InitData));
        }
        Ok(self.directory.clone())
    }

    async fn top_anomalies(&self) -> ClientResult<Vec<Hotspot>> {
        self.record(Endpoint::TopAnomalies, "", "");
        if self.fail_hotspots.load(Ordering::SeqCst) {
            return Err(unavailable(Endpoint::TopAnomalies));
        }
        Ok(self.hotspots.clone())
    }

    async fn detailed_analysis(&self, state: &str, district: &str) -> ClientResult<DetailedStats> {
        self.record(Endpoint::DetailedAnalysis, state, district);
        self.wait_for(district).await;
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(unavailable(Endpoint::DetailedAnalysis));
        }
        Ok(self
            .stats
            .get(&(state.to_string(), district.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn forecast(&self, state: &str, district: &str) -> ClientResult<Vec<ForecastPoint>> {
        self.record(Endpoint::Forecast, state, district);
        if self.stall_forecast.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.wait_for(district).await;
        if self.fail_forecast.load(Ordering::SeqCst) {
            return Err(unavailable(Endpoint::Forecast));
        }
        Ok(self
            .forecasts
            .get(&(state.to_string(), district.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Poll `condition` until it holds or two seconds pass
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

pub fn hotspot(district: &str, score: f64, val: f64) -> Hotspot {
    Hotspot {
        district: district.to_string(),
        score,
        val,
    }
}

pub fn stats(total: f64, anomaly_count: u32) -> DetailedStats {
    DetailedStats {
        total: Some(total),
        avg: Some(total / 365.0),
        anomaly_count: Some(f64::from(anomaly_count)),
        anomaly_list: Vec::new(),
    }
}

const fn unavailable(endpoint: Endpoint) -> ClientError {
    ClientError::Status {
        endpoint,
        status: 503,
    }
}
