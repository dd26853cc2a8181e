//! Interactive session driven from scripted input

#![allow(clippy::unwrap_used)]

mod common;

use aadhaar_client::Endpoint;
use aadhaar_core::Capacity;
use aadhaar_core::config::CapacityConfig;
use aadhaar_dashboard::render::HOTSPOT_PLACEHOLDER;
use aadhaar_dashboard::{DashboardController, Session};
use common::ScriptedApi;
use std::sync::Arc;

async fn run_script(api: &Arc<ScriptedApi>, script: &str) -> (DashboardController, String) {
    let controller = DashboardController::new(api.clone(), Capacity::default());
    controller.initialize().await.unwrap();

    let capacity = CapacityConfig::default();
    let mut output = Vec::new();
    Session::new(&controller, &capacity)
        .run(script.as_bytes(), &mut output)
        .await
        .unwrap();

    (controller, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_locked_until_login() {
    let api = Arc::new(ScriptedApi::maharashtra());
    let (controller, output) = run_script(&api, "show\nstate Maharashtra\nquit\n").await;

    assert!(output.contains("Access portal locked"));
    assert!(!output.contains("Region:"));
    assert_eq!(api.count(Endpoint::DetailedAnalysis), 0);
    assert!(!controller.is_logged_in());
}

#[tokio::test]
async fn test_district_walkthrough() {
    let api = Arc::new(ScriptedApi::maharashtra());
    let script = "login\nstate Maharashtra\ndistrict Pune\ncapacity 250\nquit\n";

    let (controller, output) = run_script(&api, script).await;

    assert!(output.contains("Region: Pune, Maharashtra"));
    assert!(output.contains("Center allocation at 250 per center"));
    assert!(output.contains("Thane"));
    assert!(!output.contains(HOTSPOT_PLACEHOLDER));

    let centers: Vec<u64> = controller.allocation().iter().map(|e| e.centers).collect();
    assert_eq!(centers, vec![4, 6]);
}

#[tokio::test]
async fn test_capacity_control_bounds() {
    let api = Arc::new(ScriptedApi::maharashtra());
    let script = "login\ncapacity 75\ncapacity 525\ncapacity 0\nquit\n";

    let (controller, output) = run_script(&api, script).await;

    assert_eq!(output.matches("Error:").count(), 3);
    assert_eq!(controller.snapshot().capacity, Capacity::default());
}

#[tokio::test]
async fn test_district_requires_state() {
    let api = Arc::new(ScriptedApi::maharashtra());
    let (_, output) = run_script(&api, "login\ndistrict Pune\n").await;

    assert!(output.contains("No state selected"));
    assert_eq!(api.count(Endpoint::Forecast), 0);
}

#[tokio::test]
async fn test_unknown_names_are_rejected() {
    let api = Arc::new(ScriptedApi::maharashtra());
    let script = "login\nstate Atlantis\nstate Kerala\ndistrict Pune\n";

    let (_, output) = run_script(&api, script).await;

    assert!(output.contains("Unknown state 'Atlantis'"));
    assert!(output.contains("Unknown district 'Pune'"));
    assert_eq!(api.count(Endpoint::DetailedAnalysis), 1);
}

#[tokio::test]
async fn test_hotspot_placeholder_after_failure() {
    let api = Arc::new(ScriptedApi::maharashtra());
    api.fail_hotspots();

    let (_, output) = run_script(&api, "login\n").await;

    assert!(output.contains(HOTSPOT_PLACEHOLDER));
}

#[tokio::test]
async fn test_json_and_bad_input() {
    let api = Arc::new(ScriptedApi::maharashtra());
    let script = "login\nstate Kerala\njson\nfly away\n";

    let (_, output) = run_script(&api, script).await;

    assert!(output.contains("\"summary\""));
    assert!(output.contains("\"total_history\": 800000.0"));
    assert!(output.contains("unknown command `fly`"));
}
