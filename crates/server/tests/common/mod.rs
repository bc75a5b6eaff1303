//! Common test utilities for driving the API in-process.
//!
//! The fixture wires the real router over an in-memory launch store seeded
//! with the core fixtures, so requests never touch the network.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use launchlog_core::{Config, LaunchService, SpaceTrackConfig, SqliteLaunchStore};
use launchlog_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use launchlog_core::testing::fixtures;

/// Test fixture for API testing.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_latest() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/v3/launches/latest").await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The store behind the router, for seeding extra launches
    pub store: Arc<SqliteLaunchStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture seeded with [`fixtures::launches`].
    pub fn new() -> Self {
        Self::with_launches(fixtures::launches())
    }

    /// Fixture seeded with the given launch documents.
    pub fn with_launches(launches: Vec<Value>) -> Self {
        let store = Arc::new(SqliteLaunchStore::in_memory().expect("Failed to create store"));
        for launch in &launches {
            store.upsert(launch).expect("Failed to insert launch");
        }

        let config = Config {
            space_track: Some(SpaceTrackConfig {
                identity: "ops@example.com".to_string(),
                password: "hunter2".to_string(),
                base_url: "https://www.space-track.org".to_string(),
                timeout_secs: 60,
            }),
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            LaunchService::new(store.clone()),
        ));

        Self {
            router: create_router(state),
            store,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Flight numbers of an array response, in order.
pub fn flight_numbers(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|launch| launch["flight_number"].as_i64().expect("flight_number"))
        .collect()
}
