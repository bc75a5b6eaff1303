//! Orbit reconciliation integration tests.
//!
//! These tests run the reconciler against a real SQLite launch store and a
//! mock Space-Track source:
//! - Which payloads are selected for update
//! - Conversion of string snapshot fields into typed orbit parameters
//! - Login and fetch failure handling
//! - Run summaries

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use launchlog_core::{
    launches::{LaunchQuery, LaunchStore, SqliteLaunchStore},
    orbits::{OrbitError, OrbitReconciler, SpaceTrackError, SyncReport},
    query::Filter,
    testing::{fixtures, MockOrbitSource},
};

/// Test helper wiring a file-backed store and a mock source.
struct TestHarness {
    reconciler: OrbitReconciler,
    store: Arc<SqliteLaunchStore>,
    source: Arc<MockOrbitSource>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new(launches: Vec<Value>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteLaunchStore::new(&temp_dir.path().join("launches.db"))
                .expect("Failed to create launch store"),
        );
        for launch in &launches {
            store.upsert(launch).expect("Failed to insert launch");
        }
        let source = Arc::new(MockOrbitSource::new());
        let reconciler = OrbitReconciler::new(store.clone(), source.clone());

        Self {
            reconciler,
            store,
            source,
            _temp_dir: temp_dir,
        }
    }

    async fn orbit_params(&self, flight_number: i64, payload: usize) -> Value {
        let docs = self
            .store
            .find(&LaunchQuery::new(Filter::flight_number(flight_number)))
            .await
            .expect("Failed to read launch");
        docs[0]["rocket"]["second_stage"]["payloads"][payload]["orbit_params"].clone()
    }
}

#[tokio::test]
async fn test_only_matching_payloads_are_updated() {
    let harness = TestHarness::new(vec![
        fixtures::launch(1, false, &[&[100]]),
        fixtures::launch(2, false, &[&[200]]),
    ]);
    harness
        .source
        .set_snapshots(vec![fixtures::snapshot("100", "15.5")])
        .await;

    let report = harness.reconciler.run().await.unwrap();

    assert_eq!(
        report,
        SyncReport {
            processed: 2,
            updated: 1,
            missed: 1,
            invalid: 0
        }
    );
    assert_eq!(harness.orbit_params(1, 0).await["mean_motion"], json!(15.5));
    assert_eq!(harness.orbit_params(2, 0).await, json!({}));
}

#[tokio::test]
async fn test_snapshot_strings_become_typed_values() {
    let harness = TestHarness::new(vec![fixtures::launch(1, false, &[&[100]])]);
    harness
        .source
        .set_snapshots(vec![fixtures::snapshot("100", "15.49")])
        .await;

    harness.reconciler.run().await.unwrap();

    let params = harness.orbit_params(1, 0).await;
    assert_eq!(params["epoch"], "2018-04-01T12:00:00.000Z");
    assert_eq!(params["mean_motion"], json!(15.49));
    assert_eq!(params["raan"], json!(120.25));
    assert_eq!(params["arg_of_pericenter"], json!(90.0));
    assert_eq!(params["mean_anomaly"], json!(270.0));
    assert_eq!(params["semi_major_axis_km"], json!(6778.0));
    assert_eq!(params["eccentricity"], json!(0.0005));
    assert_eq!(params["periapsis_km"], json!(396.0));
    assert_eq!(params["apoapsis_km"], json!(404.0));
    assert_eq!(params["inclination_deg"], json!(51.64));
    assert_eq!(params["period_min"], json!(92.5));
}

#[tokio::test]
async fn test_upcoming_and_id_less_payloads_are_not_considered() {
    let mut launches = fixtures::launches();
    launches.push(fixtures::launch(6, true, &[&[400]]));
    let harness = TestHarness::new(launches);
    harness
        .source
        .set_snapshots(vec![
            fixtures::snapshot("100", "15.5"),
            fixtures::snapshot("200", "1.0027"),
            fixtures::snapshot("300", "15.1"),
            fixtures::snapshot("400", "14.0"),
        ])
        .await;

    let ids = harness.reconciler.norad_ids_of_interest().await.unwrap();
    assert_eq!(ids, vec![100, 200, 300]);

    let report = harness.reconciler.run().await.unwrap();
    assert_eq!(report.processed, 3);
    assert_eq!(report.updated, 3);

    assert_eq!(harness.orbit_params(3, 0).await["mean_motion"], json!(1.0027));
    assert_eq!(harness.orbit_params(3, 0).await["regime"], "geostationary");
    assert_eq!(harness.orbit_params(3, 1).await["mean_motion"], json!(15.1));
    assert_eq!(harness.orbit_params(6, 0).await, json!({}));
    // The empty-list payload of flight 1 is left as stored
    assert!(harness.orbit_params(1, 0).await.get("mean_motion").is_none());
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_any_update() {
    let harness = TestHarness::new(vec![fixtures::launch(1, false, &[&[100]])]);
    harness
        .source
        .set_snapshots(vec![fixtures::snapshot("100", "15.5")])
        .await;
    harness
        .source
        .fail_next_fetch(SpaceTrackError::AuthenticationFailed(
            "Session rejected".to_string(),
        ))
        .await;

    let result = harness.reconciler.run().await;

    assert!(matches!(result, Err(OrbitError::Fetch(_))));
    assert_eq!(harness.source.login_calls(), 1);
    assert_eq!(harness.orbit_params(1, 0).await, json!({}));
}

#[tokio::test]
async fn test_login_failure_is_not_fatal() {
    let harness = TestHarness::new(vec![fixtures::launch(1, false, &[&[100]])]);
    harness
        .source
        .set_snapshots(vec![fixtures::snapshot("100", "15.5")])
        .await;
    harness
        .source
        .fail_next_login(SpaceTrackError::AuthenticationFailed(
            "Invalid credentials".to_string(),
        ))
        .await;

    let report = harness.reconciler.run().await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(harness.source.fetch_calls(), 1);
}

#[tokio::test]
async fn test_unusable_snapshot_is_skipped() {
    let harness = TestHarness::new(vec![
        fixtures::launch(1, false, &[&[100]]),
        fixtures::launch(2, false, &[&[200]]),
    ]);
    let mut broken = fixtures::snapshot("100", "15.5");
    broken.epoch = None;
    harness
        .source
        .set_snapshots(vec![broken, fixtures::snapshot("200", "1.0")])
        .await;

    let report = harness.reconciler.run().await.unwrap();

    assert_eq!(report.invalid, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(harness.orbit_params(1, 0).await, json!({}));
    assert_eq!(harness.orbit_params(2, 0).await["mean_motion"], json!(1.0));
}

#[tokio::test]
async fn test_first_snapshot_per_id_wins() {
    let harness = TestHarness::new(vec![fixtures::launch(1, false, &[&[100]])]);
    harness
        .source
        .set_snapshots(vec![
            fixtures::snapshot("100", "15.5"),
            fixtures::snapshot("100", "99.0"),
        ])
        .await;

    harness.reconciler.run().await.unwrap();

    assert_eq!(harness.orbit_params(1, 0).await["mean_motion"], json!(15.5));
}

#[tokio::test]
async fn test_duplicate_ids_update_the_earliest_launch() {
    let harness = TestHarness::new(vec![
        fixtures::launch(1, false, &[&[100]]),
        fixtures::launch(2, false, &[&[100]]),
    ]);
    harness
        .source
        .set_snapshots(vec![fixtures::snapshot("100", "15.5")])
        .await;

    let report = harness.reconciler.run().await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(harness.orbit_params(1, 0).await["mean_motion"], json!(15.5));
    assert_eq!(harness.orbit_params(2, 0).await, json!({}));
}

#[tokio::test]
async fn test_empty_store_processes_nothing() {
    let harness = TestHarness::new(Vec::new());
    let report = harness.reconciler.run().await.unwrap();
    assert_eq!(report, SyncReport::default());
}
