//! Types shared by the launch store and its callers.

use serde::{Deserialize, Serialize};

use crate::query::{Filter, Sort};

/// A bounded or unbounded read against the launch store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchQuery {
    pub filter: Filter,
    pub sort: Sort,
    /// `None` reads every match. Client-facing reads always set a limit.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl LaunchQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// New orbit parameters for one payload.
///
/// Field names match the payload's `orbit_params` sub-document. Every field
/// is written on update; other `orbit_params` keys (regime, reference
/// system, ...) are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitUpdate {
    /// Normalized `YYYY-MM-DDTHH:MM:SS.sssZ`.
    pub epoch: String,
    pub mean_motion: f64,
    pub raan: f64,
    pub arg_of_pericenter: f64,
    pub mean_anomaly: f64,
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub periapsis_km: f64,
    pub apoapsis_km: f64,
    pub inclination_deg: f64,
    pub period_min: f64,
}
