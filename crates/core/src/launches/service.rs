//! Read-only launch queries.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{LaunchError, LaunchQuery, LaunchStore};
use crate::query::{
    build_projection, translate, Filter, Projection, QueryParams, Sort, SortOrder,
    TranslatedQuery,
};

/// The read operations behind the launch API.
///
/// Every query is bounded and built from translated parameters. Every
/// returned document has internal fields removed.
#[derive(Clone)]
pub struct LaunchService {
    store: Arc<dyn LaunchStore>,
}

impl LaunchService {
    pub fn new(store: Arc<dyn LaunchStore>) -> Self {
        Self { store }
    }

    /// Most recent launch that has already flown.
    pub async fn latest(&self, params: &QueryParams) -> Result<Value, LaunchError> {
        let query = LaunchQuery::new(Filter::upcoming(false))
            .with_sort(Sort::by_flight_number(SortOrder::Desc))
            .with_limit(1);
        self.find_one(query, build_projection(params), "latest launch")
            .await
    }

    /// Earliest launch still to fly.
    pub async fn next(&self, params: &QueryParams) -> Result<Value, LaunchError> {
        let query = LaunchQuery::new(Filter::upcoming(true))
            .with_sort(Sort::by_flight_number(SortOrder::Asc))
            .with_limit(1);
        self.find_one(query, build_projection(params), "next launch")
            .await
    }

    /// Every launch matching the request.
    pub async fn all(&self, params: &QueryParams) -> Result<Vec<Value>, LaunchError> {
        self.find_many(translate(params), None).await
    }

    /// Past launches matching the request. A client `upcoming` filter is
    /// ignored.
    pub async fn past(&self, params: &QueryParams) -> Result<Vec<Value>, LaunchError> {
        self.find_many(translate(params), Some(false)).await
    }

    /// Upcoming launches matching the request. A client `upcoming` filter is
    /// ignored.
    pub async fn upcoming(&self, params: &QueryParams) -> Result<Vec<Value>, LaunchError> {
        self.find_many(translate(params), Some(true)).await
    }

    /// One launch by flight number.
    pub async fn one(&self, flight_number: i64, params: &QueryParams) -> Result<Value, LaunchError> {
        let query = LaunchQuery::new(Filter::flight_number(flight_number)).with_limit(1);
        self.find_one(
            query,
            build_projection(params),
            &format!("flight number {}", flight_number),
        )
        .await
    }

    async fn find_many(
        &self,
        translated: TranslatedQuery,
        upcoming: Option<bool>,
    ) -> Result<Vec<Value>, LaunchError> {
        let TranslatedQuery {
            filter,
            projection,
            sort,
            limit,
            offset,
        } = translated;

        let filter = match upcoming {
            Some(upcoming) => filter.with_upcoming(upcoming),
            None => filter,
        };

        let query = LaunchQuery::new(filter)
            .with_sort(sort)
            .with_limit(limit)
            .with_offset(offset);
        debug!(
            conditions = query.filter.conditions().len(),
            sort = query.sort.field.key,
            limit,
            offset,
            "Querying launches"
        );

        let launches = self.store.find(&query).await?;
        Ok(launches
            .into_iter()
            .map(|launch| projection.apply(launch))
            .collect())
    }

    async fn find_one(
        &self,
        query: LaunchQuery,
        projection: Projection,
        what: &str,
    ) -> Result<Value, LaunchError> {
        let launch = self
            .store
            .find(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LaunchError::NotFound(what.to_string()))?;

        Ok(projection.apply(launch))
    }
}
