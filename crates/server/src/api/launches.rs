//! Read-only launch endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use launchlog_core::{LaunchError, QueryParams};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::state::AppState;

/// Error body for launch endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(what: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Not found: {}", what.into()),
        }),
    )
}

fn error_response(e: LaunchError) -> ApiError {
    match e {
        LaunchError::NotFound(what) => not_found(what),
        LaunchError::Store(e) => {
            error!(error = %e, "Launch store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to query launches".to_string(),
                }),
            )
        }
    }
}

/// List launches
pub async fn list_launches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    state
        .launches()
        .all(&params)
        .await
        .map(Json)
        .map_err(error_response)
}

/// List past launches
pub async fn list_past(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    state
        .launches()
        .past(&params)
        .await
        .map(Json)
        .map_err(error_response)
}

/// List upcoming launches
pub async fn list_upcoming(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    state
        .launches()
        .upcoming(&params)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Most recent past launch
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    state
        .launches()
        .latest(&params)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Next upcoming launch
pub async fn get_next(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    state
        .launches()
        .next(&params)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Get a launch by flight number
pub async fn get_launch(
    State(state): State<Arc<AppState>>,
    Path(flight_number): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    // Anything but an integer cannot name a launch
    let Ok(flight_number) = flight_number.trim().parse::<i64>() else {
        return Err(not_found(format!("flight number {}", flight_number)));
    };

    state
        .launches()
        .one(flight_number, &params)
        .await
        .map(Json)
        .map_err(error_response)
}
