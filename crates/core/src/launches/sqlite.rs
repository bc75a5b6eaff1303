//! SQLite-backed launch document store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, ToSql};
use serde_json::{Map, Value};
use tracing::debug;

use super::{LaunchQuery, LaunchStore, OrbitUpdate, StoreError};
use crate::query::fields::{self, FieldLocation, CORES_PATH, PAYLOADS_PATH};
use crate::query::{Comparison, Filter, FilterValue, Sort};

/// SQLite-backed launch store.
///
/// Each launch is one row; the full document lives in `data` as JSON and is
/// queried with SQLite's JSON functions. `flight_number` and `upcoming` are
/// mirrored into columns for the common predicates.
pub struct SqliteLaunchStore {
    conn: Mutex<Connection>,
}

impl SqliteLaunchStore {
    /// Open (or create) a launch store at `path`.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open an existing launch store, failing if the database file is missing.
    pub fn open_existing(path: &Path) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| StoreError::Database(format!("{}: {}", path.display(), e)))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory launch store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- One row per launch; data holds the full JSON document
            CREATE TABLE IF NOT EXISTS launches (
                flight_number INTEGER PRIMARY KEY,
                upcoming INTEGER NOT NULL DEFAULT 0,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_launches_upcoming ON launches(upcoming, flight_number);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("launch store lock poisoned".to_string()))
    }

    /// Insert a launch document, replacing any launch with the same flight
    /// number. Used by ingestion and fixtures; the API never writes.
    pub fn upsert(&self, launch: &Value) -> Result<(), StoreError> {
        let flight_number = launch
            .get("flight_number")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                StoreError::InvalidDocument("flight_number must be an integer".to_string())
            })?;
        let upcoming = launch
            .get("upcoming")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let data =
            serde_json::to_string(launch).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO launches (flight_number, upcoming, data) VALUES (?, ?, ?)
             ON CONFLICT(flight_number) DO UPDATE SET
                upcoming = excluded.upcoming,
                data = excluded.data",
            params![flight_number, upcoming, data],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Number of stored launches.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM launches", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn build_where_clause(filter: &Filter) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        for condition in filter.conditions() {
            let op = match condition.comparison {
                Comparison::Eq => "=",
                Comparison::Gte => ">=",
                Comparison::Lte => "<=",
            };

            // Paths come from the static allow-list, never from the request.
            let sql = if condition.field.key == fields::FLIGHT_NUMBER.key {
                format!("launches.flight_number {} ?", op)
            } else if condition.field.key == fields::UPCOMING.key {
                format!("launches.upcoming {} ?", op)
            } else {
                match condition.location() {
                    FieldLocation::Document(path) => {
                        format!("json_extract(launches.data, '{}') {} ?", path, op)
                    }
                    FieldLocation::Payload(path) => format!(
                        "EXISTS (SELECT 1 FROM json_each(launches.data, '{}') AS p \
                         WHERE json_extract(p.value, '{}') {} ?)",
                        PAYLOADS_PATH, path, op
                    ),
                    FieldLocation::PayloadList(path) => format!(
                        "EXISTS (SELECT 1 FROM json_each(launches.data, '{}') AS p, \
                         json_each(p.value, '{}') AS v WHERE v.value {} ?)",
                        PAYLOADS_PATH, path, op
                    ),
                    FieldLocation::Core(path) => format!(
                        "EXISTS (SELECT 1 FROM json_each(launches.data, '{}') AS c \
                         WHERE json_extract(c.value, '{}') {} ?)",
                        CORES_PATH, path, op
                    ),
                }
            };
            conditions.push(sql);

            let param: Box<dyn ToSql> = match &condition.value {
                FilterValue::Integer(i) => Box::new(*i),
                FilterValue::Float(f) => Box::new(*f),
                FilterValue::Boolean(b) => Box::new(*b),
                FilterValue::Text(s) => Box::new(s.clone()),
            };
            params.push(param);
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn build_order_clause(sort: &Sort) -> String {
        let direction = sort.order.as_sql();
        if sort.field.key == fields::SORT_FLIGHT_NUMBER.key {
            format!("ORDER BY launches.flight_number {}", direction)
        } else {
            // Flight number breaks ties so pagination is stable.
            format!(
                "ORDER BY json_extract(launches.data, '{}') {}, launches.flight_number ASC",
                sort.field.path, direction
            )
        }
    }

    fn parse_document(data: &str) -> Result<Value, StoreError> {
        serde_json::from_str(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Set every orbit field on the first payload listing `norad_id`.
///
/// Returns `false` if the document has no such payload.
fn apply_orbit_update(document: &mut Value, norad_id: u64, update: &OrbitUpdate) -> bool {
    let Some(payloads) = document
        .pointer_mut("/rocket/second_stage/payloads")
        .and_then(Value::as_array_mut)
    else {
        return false;
    };

    let Some(payload) = payloads.iter_mut().find(|payload| {
        payload
            .get("norad_id")
            .and_then(Value::as_array)
            .is_some_and(|ids| ids.iter().any(|id| id.as_u64() == Some(norad_id)))
    }) else {
        return false;
    };

    let Some(payload) = payload.as_object_mut() else {
        return false;
    };
    let orbit_params = payload
        .entry("orbit_params")
        .or_insert_with(|| Value::Object(Map::new()));
    if !orbit_params.is_object() {
        *orbit_params = Value::Object(Map::new());
    }

    if let (Some(target), Ok(Value::Object(fields))) =
        (orbit_params.as_object_mut(), serde_json::to_value(update))
    {
        for (key, value) in fields {
            target.insert(key, value);
        }
        return true;
    }
    false
}

#[async_trait]
impl LaunchStore for SqliteLaunchStore {
    async fn find(&self, query: &LaunchQuery) -> Result<Vec<Value>, StoreError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(&query.filter);
        let order_clause = Self::build_order_clause(&query.sort);

        let sql = format!(
            "SELECT launches.data FROM launches {} {} LIMIT ? OFFSET ?",
            where_clause, order_clause
        );
        debug!(sql = %sql, "Launch query");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // A negative LIMIT means no limit in SQLite.
        let mut all_params = params;
        all_params.push(Box::new(query.limit.map(i64::from).unwrap_or(-1)));
        all_params.push(Box::new(i64::from(query.offset)));

        let param_refs: Vec<&dyn ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut launches = Vec::new();
        for row in rows {
            let data = row.map_err(|e| StoreError::Database(e.to_string()))?;
            launches.push(Self::parse_document(&data)?);
        }

        Ok(launches)
    }

    async fn update_orbit(&self, norad_id: u64, update: &OrbitUpdate) -> Result<bool, StoreError> {
        let norad_id_sql = i64::try_from(norad_id)
            .map_err(|_| StoreError::InvalidDocument(format!("NORAD id {} out of range", norad_id)))?;

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let found: Option<(i64, String)> = tx
            .query_row(
                &format!(
                    "SELECT launches.flight_number, launches.data FROM launches
                     WHERE EXISTS (
                        SELECT 1 FROM json_each(launches.data, '{}') AS p,
                                      json_each(p.value, '$.norad_id') AS v
                        WHERE v.value = ?
                     )
                     ORDER BY launches.flight_number ASC
                     LIMIT 1",
                    PAYLOADS_PATH
                ),
                params![norad_id_sql],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some((flight_number, data)) = found else {
            return Ok(false);
        };

        let mut document = Self::parse_document(&data)?;
        if !apply_orbit_update(&mut document, norad_id, update) {
            return Ok(false);
        }

        let data = serde_json::to_string(&document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tx.execute(
            "UPDATE launches SET data = ? WHERE flight_number = ?",
            params![data, flight_number],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_filter, QueryParams, SortOrder};
    use crate::testing::fixtures;
    use serde_json::json;

    fn create_test_store() -> SqliteLaunchStore {
        let store = SqliteLaunchStore::in_memory().unwrap();
        for launch in fixtures::launches() {
            store.upsert(&launch).unwrap();
        }
        store
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn flight_numbers(docs: &[Value]) -> Vec<i64> {
        docs.iter()
            .map(|d| d["flight_number"].as_i64().unwrap())
            .collect()
    }

    async fn find(store: &SqliteLaunchStore, query: LaunchQuery) -> Vec<i64> {
        flight_numbers(&store.find(&query).await.unwrap())
    }

    #[tokio::test]
    async fn test_find_all_default_order() {
        let store = create_test_store();
        let found = find(&store, LaunchQuery::new(Filter::new())).await;
        assert_eq!(found, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_find_upcoming_column() {
        let store = create_test_store();
        let past = find(&store, LaunchQuery::new(Filter::upcoming(false))).await;
        let upcoming = find(&store, LaunchQuery::new(Filter::upcoming(true))).await;
        assert_eq!(past, vec![1, 2, 3]);
        assert_eq!(upcoming, vec![4, 5]);
    }

    #[tokio::test]
    async fn test_find_document_field() {
        let store = create_test_store();
        let filter = build_filter(&params(&[("rocket_id", "falcon9")]));
        assert_eq!(find(&store, LaunchQuery::new(filter)).await, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn test_find_payload_and_list_fields() {
        let store = create_test_store();

        let by_orbit = build_filter(&params(&[("orbit", "GTO")]));
        assert_eq!(find(&store, LaunchQuery::new(by_orbit)).await, vec![3]);

        let by_norad = build_filter(&params(&[("norad_id", "200")]));
        assert_eq!(find(&store, LaunchQuery::new(by_norad)).await, vec![3]);

        let by_customer = build_filter(&params(&[("customer", "NASA")]));
        assert_eq!(find(&store, LaunchQuery::new(by_customer)).await, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_find_core_field() {
        let store = create_test_store();
        let filter = build_filter(&params(&[("core_serial", "B1021")]));
        assert_eq!(find(&store, LaunchQuery::new(filter)).await, vec![3]);

        let filter = build_filter(&params(&[("land_success", "true")]));
        assert_eq!(find(&store, LaunchQuery::new(filter)).await, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_find_date_range() {
        let store = create_test_store();
        let filter = build_filter(&params(&[("start", "2010-01-01"), ("end", "2017-12-31")]));
        assert_eq!(find(&store, LaunchQuery::new(filter)).await, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_find_sort_limit_offset() {
        let store = create_test_store();
        let query = LaunchQuery::new(Filter::new())
            .with_sort(Sort::by_flight_number(SortOrder::Desc))
            .with_limit(2)
            .with_offset(1);
        assert_eq!(find(&store, query).await, vec![4, 3]);
    }

    #[tokio::test]
    async fn test_find_sort_by_json_field() {
        let store = create_test_store();
        let sort = crate::query::build_sort(&params(&[("sort", "mission_name")]));
        let query = LaunchQuery::new(Filter::upcoming(false)).with_sort(sort);
        // CRS-1 < FalconSat < Thaicom 8
        assert_eq!(find(&store, query).await, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_find_returns_internal_fields() {
        let store = create_test_store();
        let docs = store
            .find(&LaunchQuery::new(Filter::flight_number(2)))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].get("reuse").is_some());
    }

    #[tokio::test]
    async fn test_hostile_text_value_is_bound_not_interpolated() {
        let store = create_test_store();
        let filter = build_filter(&params(&[("mission_name", "x' OR '1'='1")]));
        assert!(find(&store, LaunchQuery::new(filter)).await.is_empty());
        assert_eq!(store.count().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_update_orbit_targets_matching_payload_only() {
        let store = create_test_store();
        let update = fixtures::orbit_update();

        assert!(store.update_orbit(200, &update).await.unwrap());

        let doc = &store
            .find(&LaunchQuery::new(Filter::flight_number(3)))
            .await
            .unwrap()[0];
        let payloads = doc["rocket"]["second_stage"]["payloads"].as_array().unwrap();

        let updated = &payloads[0]["orbit_params"];
        assert_eq!(updated["mean_motion"], json!(15.5));
        assert_eq!(updated["epoch"], "2018-04-01T12:00:00.000Z");
        // Untouched keys survive
        assert_eq!(updated["regime"], "geostationary");

        let other = &payloads[1]["orbit_params"];
        assert!(other.get("mean_motion").is_none());
    }

    #[tokio::test]
    async fn test_update_orbit_creates_missing_orbit_params() {
        let store = SqliteLaunchStore::in_memory().unwrap();
        let mut doc = fixtures::launch(9, false, &[&[555]]);
        doc["rocket"]["second_stage"]["payloads"][0]
            .as_object_mut()
            .unwrap()
            .remove("orbit_params");
        store.upsert(&doc).unwrap();

        assert!(store
            .update_orbit(555, &fixtures::orbit_update())
            .await
            .unwrap());
        let doc = &store
            .find(&LaunchQuery::new(Filter::flight_number(9)))
            .await
            .unwrap()[0];
        assert_eq!(
            doc["rocket"]["second_stage"]["payloads"][0]["orbit_params"]["period_min"],
            json!(92.5)
        );
    }

    #[tokio::test]
    async fn test_update_orbit_unknown_id() {
        let store = create_test_store();
        assert!(!store
            .update_orbit(999_999, &fixtures::orbit_update())
            .await
            .unwrap());
    }

    #[test]
    fn test_upsert_requires_flight_number() {
        let store = SqliteLaunchStore::in_memory().unwrap();
        let result = store.upsert(&json!({"mission_name": "nameless"}));
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[test]
    fn test_upsert_replaces() {
        let store = SqliteLaunchStore::in_memory().unwrap();
        store.upsert(&fixtures::launch(1, true, &[])).unwrap();
        store.upsert(&fixtures::launch(1, false, &[])).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_open_existing_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteLaunchStore::open_existing(&dir.path().join("missing.db"));
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[test]
    fn test_open_existing_after_new() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.db");
        SqliteLaunchStore::new(&path)
            .unwrap()
            .upsert(&fixtures::launch(1, false, &[]))
            .unwrap();

        let reopened = SqliteLaunchStore::open_existing(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
