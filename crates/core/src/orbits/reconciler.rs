//! The reconciliation job.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ElementSnapshot, OrbitError, OrbitSource, ReconcileOutcome, SyncReport};
use crate::launches::{LaunchQuery, LaunchStore, OrbitUpdate};
use crate::query::{Filter, Sort, SortOrder};

/// Store updates in flight at once. Updates are applied in identifier order.
pub const UPDATE_CONCURRENCY: usize = 1;

/// First NORAD id of every payload, in launch order then payload order.
///
/// Payloads with a missing or empty `norad_id` list contribute nothing.
/// Duplicates are kept.
pub fn collect_norad_ids(launches: &[Value]) -> Vec<u64> {
    launches
        .iter()
        .filter_map(|launch| launch.pointer("/rocket/second_stage/payloads")?.as_array())
        .flatten()
        .filter_map(|payload| payload.get("norad_id")?.as_array()?.first()?.as_u64())
        .collect()
}

/// First snapshot per catalog id.
fn index_snapshots(snapshots: &[ElementSnapshot]) -> HashMap<u64, &ElementSnapshot> {
    let mut index = HashMap::with_capacity(snapshots.len());
    for snapshot in snapshots {
        match snapshot.catalog_id() {
            Some(id) => {
                index.entry(id).or_insert(snapshot);
            }
            None => debug!(norad_cat_id = ?snapshot.norad_cat_id, "Skipping snapshot without catalog id"),
        }
    }
    index
}

/// Copies the latest Space-Track elements into flown payloads.
pub struct OrbitReconciler {
    store: Arc<dyn LaunchStore>,
    source: Arc<dyn OrbitSource>,
}

impl OrbitReconciler {
    pub fn new(store: Arc<dyn LaunchStore>, source: Arc<dyn OrbitSource>) -> Self {
        Self { store, source }
    }

    /// NORAD ids of payloads on launches that have flown.
    pub async fn norad_ids_of_interest(&self) -> Result<Vec<u64>, OrbitError> {
        let query = LaunchQuery::new(Filter::upcoming(false))
            .with_sort(Sort::by_flight_number(SortOrder::Asc));
        let launches = self.store.find(&query).await?;
        Ok(collect_norad_ids(&launches))
    }

    /// Run one reconciliation pass.
    ///
    /// A failed login is logged and the fetch attempted anyway. A failed
    /// fetch aborts the run before any update. Ids without a snapshot are
    /// skipped.
    pub async fn run(&self) -> Result<SyncReport, OrbitError> {
        let ids = self.norad_ids_of_interest().await?;
        info!(count = ids.len(), "Collected NORAD ids of flown payloads");

        if let Err(e) = self.source.login().await {
            warn!(error = %e, "Space-Track login failed, attempting fetch anyway");
        }

        let snapshots = self
            .source
            .latest_elements()
            .await
            .map_err(OrbitError::Fetch)?;
        let index = index_snapshots(&snapshots);
        let index = &index;

        let report = stream::iter(ids)
            .map(|norad_id| self.reconcile_one(norad_id, index))
            .buffered(UPDATE_CONCURRENCY)
            .try_fold(SyncReport::default(), |mut report, outcome| async move {
                report.record(outcome);
                Ok::<_, OrbitError>(report)
            })
            .await?;

        info!(
            updated = report.updated,
            missed = report.missed,
            invalid = report.invalid,
            "{} launch orbits processed",
            report.processed
        );
        Ok(report)
    }

    async fn reconcile_one(
        &self,
        norad_id: u64,
        index: &HashMap<u64, &ElementSnapshot>,
    ) -> Result<ReconcileOutcome, OrbitError> {
        let Some(snapshot) = index.get(&norad_id) else {
            debug!(norad_id, "No recent elements");
            return Ok(ReconcileOutcome::Missed);
        };

        let update = match OrbitUpdate::try_from(*snapshot) {
            Ok(update) => update,
            Err(e) => {
                warn!(norad_id, error = %e, "Skipping unusable snapshot");
                return Ok(ReconcileOutcome::Invalid);
            }
        };

        info!("Updating {}", snapshot.display_name());
        debug!(norad_id, ?update, "Orbit update");

        if self.store.update_orbit(norad_id, &update).await? {
            Ok(ReconcileOutcome::Updated)
        } else {
            debug!(norad_id, "No payload carries this id");
            Ok(ReconcileOutcome::Missed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use serde_json::json;

    #[test]
    fn test_collect_takes_first_id_per_payload() {
        let launches = vec![
            fixtures::launch(1, false, &[&[10, 11], &[]]),
            fixtures::launch(2, false, &[&[20], &[10]]),
        ];
        assert_eq!(collect_norad_ids(&launches), vec![10, 20, 10]);
    }

    #[test]
    fn test_collect_skips_payloads_without_ids() {
        let launches = vec![
            json!({"flight_number": 1, "rocket": {"second_stage": {"payloads": [{"payload_id": "x"}]}}}),
            json!({"flight_number": 2, "rocket": {}}),
            json!({"flight_number": 3, "rocket": {"second_stage": {"payloads": [{"norad_id": ["bad"]}]}}}),
        ];
        assert!(collect_norad_ids(&launches).is_empty());
    }

    #[test]
    fn test_index_keeps_first_snapshot() {
        let snapshots = vec![
            fixtures::snapshot("100", "1.0"),
            fixtures::snapshot("100", "2.0"),
            fixtures::snapshot("not-a-number", "3.0"),
        ];
        let index = index_snapshots(&snapshots);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&100].mean_motion.as_deref(), Some("1.0"));
    }
}
