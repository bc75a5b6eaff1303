//! Space-Track element snapshots and their conversion to orbit updates.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::OrbitError;
use crate::launches::OrbitUpdate;
use crate::query::normalize_date;

/// Space-Track sends numbers as strings; accept both.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// One element set from the `tle_latest` class.
///
/// Only the fields written to payloads are kept; the rest of the record is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ElementSnapshot {
    #[serde(default, deserialize_with = "string_or_number")]
    pub norad_cat_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub object_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub epoch: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mean_motion: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ra_of_asc_node: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub arg_of_pericenter: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mean_anomaly: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub semimajor_axis: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub eccentricity: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub perigee: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub apogee: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub inclination: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub period: Option<String>,
}

impl ElementSnapshot {
    /// The catalog id as an integer, if it parses.
    pub fn catalog_id(&self) -> Option<u64> {
        self.norad_cat_id.as_deref()?.trim().parse().ok()
    }

    pub fn display_name(&self) -> &str {
        self.object_name.as_deref().unwrap_or("UNKNOWN")
    }

    fn float(&self, value: &Option<String>, field: &'static str) -> Result<f64, OrbitError> {
        value
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(field))
    }

    fn invalid(&self, field: &'static str) -> OrbitError {
        OrbitError::InvalidSnapshot {
            norad_id: self.norad_cat_id.clone().unwrap_or_default(),
            field,
        }
    }
}

impl TryFrom<&ElementSnapshot> for OrbitUpdate {
    type Error = OrbitError;

    fn try_from(s: &ElementSnapshot) -> Result<Self, Self::Error> {
        let epoch = s
            .epoch
            .as_deref()
            .and_then(normalize_date)
            .ok_or_else(|| s.invalid("EPOCH"))?;

        Ok(OrbitUpdate {
            epoch,
            mean_motion: s.float(&s.mean_motion, "MEAN_MOTION")?,
            raan: s.float(&s.ra_of_asc_node, "RA_OF_ASC_NODE")?,
            arg_of_pericenter: s.float(&s.arg_of_pericenter, "ARG_OF_PERICENTER")?,
            mean_anomaly: s.float(&s.mean_anomaly, "MEAN_ANOMALY")?,
            semi_major_axis_km: s.float(&s.semimajor_axis, "SEMIMAJOR_AXIS")?,
            eccentricity: s.float(&s.eccentricity, "ECCENTRICITY")?,
            periapsis_km: s.float(&s.perigee, "PERIGEE")?,
            apoapsis_km: s.float(&s.apogee, "APOGEE")?,
            inclination_deg: s.float(&s.inclination, "INCLINATION")?,
            period_min: s.float(&s.period, "PERIOD")?,
        })
    }
}

/// Outcome of reconciling one NORAD id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Updated,
    /// No snapshot, or no payload left to update.
    Missed,
    /// The snapshot did not convert.
    Invalid,
}

/// Summary of a reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Identifiers of interest walked, duplicates included.
    pub processed: usize,
    pub updated: usize,
    pub missed: usize,
    pub invalid: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: ReconcileOutcome) {
        self.processed += 1;
        match outcome {
            ReconcileOutcome::Updated => self.updated += 1,
            ReconcileOutcome::Missed => self.missed += 1,
            ReconcileOutcome::Invalid => self.invalid += 1,
        }
    }
}
