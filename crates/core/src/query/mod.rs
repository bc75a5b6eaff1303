//! Query-string translation.
//!
//! Turns untrusted query-string parameters into a filter, projection, sort,
//! limit and offset. Translation never fails: malformed input is dropped or
//! replaced by a default, so every output is safe to hand to the store.

pub mod fields;
mod filter;
mod paging;
mod projection;
mod sort;

use std::collections::BTreeMap;

pub use filter::{
    build_filter, coerce, normalize_date, Comparison, Condition, Filter, FilterValue,
    RANGE_END_KEY, RANGE_START_KEY,
};
pub use paging::{
    build_limit, build_offset, DEFAULT_LIMIT, LIMIT_KEY, MAX_LIMIT, MAX_OFFSET, OFFSET_KEY,
};
pub use projection::{
    build_projection, strip_internal, Projection, FIELDS_ALIAS_KEY, FIELDS_KEY,
    MAX_PROJECTION_FIELDS,
};
pub use sort::{build_sort, Sort, SortOrder, ORDER_KEY, SORT_KEY};

/// Raw query-string parameters, keyed by name.
pub type QueryParams = BTreeMap<String, String>;

/// Keys that control the query shape and are never used as filters.
pub const RESERVED_KEYS: &[&str] = &[
    SORT_KEY,
    ORDER_KEY,
    LIMIT_KEY,
    OFFSET_KEY,
    FIELDS_KEY,
    FIELDS_ALIAS_KEY,
];

/// Everything derived from one request's query string.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedQuery {
    pub filter: Filter,
    pub projection: Projection,
    pub sort: Sort,
    pub limit: u32,
    pub offset: u32,
}

/// Translate query-string parameters.
pub fn translate(params: &QueryParams) -> TranslatedQuery {
    TranslatedQuery {
        filter: build_filter(params),
        projection: build_projection(params),
        sort: build_sort(params),
        limit: build_limit(params),
        offset: build_offset(params),
    }
}
