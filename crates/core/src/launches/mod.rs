//! Launch records: storage and the read-only query service.
//!
//! Launches are schemaless JSON documents keyed by flight number. The store
//! only understands the handful of paths it needs for filtering, sorting and
//! the targeted orbit update; everything else is passed through verbatim.

mod service;
mod sqlite;
mod types;

pub use service::LaunchService;
pub use sqlite::SqliteLaunchStore;
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Trait for launch document storage.
#[async_trait]
pub trait LaunchStore: Send + Sync {
    /// Find launch documents matching the query, in the query's sort order.
    ///
    /// Documents are returned as stored, internal fields included.
    async fn find(&self, query: &LaunchQuery) -> Result<Vec<Value>, StoreError>;

    /// Overwrite the orbit parameters of one payload.
    ///
    /// Targets the first launch (by flight number) with a payload whose
    /// `norad_id` list contains `norad_id`, and within it only the first
    /// such payload. Returns `false` when no payload matched.
    async fn update_orbit(&self, norad_id: u64, update: &OrbitUpdate) -> Result<bool, StoreError>;
}

/// Errors for launch store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid launch document: {0}")]
    InvalidDocument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors surfaced by the launch query service.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
