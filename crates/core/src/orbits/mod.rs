//! Orbit reconciliation against Space-Track.
//!
//! A one-shot batch job: collect the NORAD ids of payloads that have flown,
//! fetch the latest orbital elements from Space-Track in one bulk call, and
//! write each match into the payload's `orbit_params`.

mod reconciler;
mod space_track;
mod types;

pub use reconciler::{collect_norad_ids, OrbitReconciler, UPDATE_CONCURRENCY};
pub use space_track::{SpaceTrackClient, LATEST_ELEMENTS_PATH, LOGIN_PATH};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::launches::StoreError;

/// Errors from the Space-Track HTTP API.
#[derive(Debug, Clone, Error)]
pub enum SpaceTrackError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for SpaceTrackError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpaceTrackError::Timeout
        } else if e.is_connect() {
            SpaceTrackError::ConnectionFailed(e.to_string())
        } else {
            SpaceTrackError::Http(e.to_string())
        }
    }
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum OrbitError {
    /// The bulk element fetch failed; no snapshot set is usable.
    #[error("Failed to fetch orbital elements: {0}")]
    Fetch(#[source] SpaceTrackError),

    #[error("Launch store error: {0}")]
    Store(#[from] StoreError),

    /// A snapshot field could not be converted. Never aborts a run; the
    /// snapshot is skipped.
    #[error("Invalid snapshot for NORAD id {norad_id}: {field}")]
    InvalidSnapshot { norad_id: String, field: &'static str },
}

/// Source of orbital element snapshots.
#[async_trait]
pub trait OrbitSource: Send + Sync {
    /// Open a session.
    async fn login(&self) -> Result<(), SpaceTrackError>;

    /// Most recent element set for every object with an epoch in the last
    /// 30 days, one per object.
    async fn latest_elements(&self) -> Result<Vec<ElementSnapshot>, SpaceTrackError>;
}
