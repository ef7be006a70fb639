//! Backend integration tests
//!
//! The `#[ignore]` tests need a coordination backend on BASE_URL.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

use sitecoord::{
    availability::OverviewFilter,
    config::ApiConfig,
    models::{fleet::FleetEvents, LifecycleStage},
    repository::Repository,
    services::{fleet::FleetService, Services},
    AppConfig,
};

const BASE_URL: &str = "http://localhost:3000/api/v1";

fn repository() -> Repository {
    let config = ApiConfig {
        base_url: format!("{}/", BASE_URL),
        ..ApiConfig::default()
    };
    Repository::new(&config).expect("Failed to build HTTP client")
}

#[test]
fn test_repository_trims_base_url() {
    assert_eq!(repository().base_url(), BASE_URL);
}

#[test]
fn test_unreachable_backend_is_network_error() {
    let config = ApiConfig {
        base_url: "http://127.0.0.1:9/api/v1".to_string(),
        timeout_secs: Some(2),
        ..ApiConfig::default()
    };
    let services = Services::new(
        Repository::new(&config).expect("Failed to build HTTP client"),
        AppConfig::default().fleet,
    );

    let err = tokio_test::block_on(services.fleet.refresh()).unwrap_err();
    assert_eq!(err.category(), sitecoord::error::ErrorCategory::Network);
}

#[tokio::test]
#[ignore]
async fn test_fleet_events_shape() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment/events/fleet", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["assignments"].is_array());
    assert!(body["services"].is_array());
    assert!(body["movements"].is_array());

    let events: FleetEvents = serde_json::from_value(body).expect("Unexpected fleet events payload");
    for a in &events.assignments {
        assert!(a.end_date.map_or(true, |end| end >= a.start_date));
    }
}

#[tokio::test]
#[ignore]
async fn test_dashboard_stage_filter() {
    let projects = repository()
        .projects_dashboard(Some(LifecycleStage::Ongoing))
        .await
        .expect("Failed to fetch projects");

    assert!(projects.iter().all(|p| p.lifecycle_stage == LifecycleStage::Ongoing));
}

#[tokio::test]
#[ignore]
async fn test_reject_without_note_is_refused() {
    let client = Client::new();

    let response = client
        .post(format!("{}/equipment/requests/0/reject", BASE_URL))
        .json(&json!({ "decisionNote": "" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_client_error());
}

#[tokio::test]
#[ignore]
async fn test_overview_counts_cover_fleet() {
    let services = Services::new(repository(), AppConfig::default().fleet);
    let today = FleetService::today();

    let counts = services
        .fleet
        .overview_counts(&OverviewFilter::default(), today)
        .await
        .expect("Failed to load fleet");
    let snapshot = services.fleet.snapshot().await.expect("Failed to load fleet");

    assert_eq!(counts.values().sum::<usize>(), snapshot.equipment.len());
    assert!(snapshot
        .projects
        .iter()
        .all(|p| p.lifecycle_stage != LifecycleStage::Estimation));
}
