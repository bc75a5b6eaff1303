//! Sort order built from query-string parameters.

use tracing::debug;

use super::fields::{self, SortField};
use super::QueryParams;

pub const SORT_KEY: &str = "sort";
pub const ORDER_KEY: &str = "order";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse `asc` / `desc` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Some(Self::Asc),
            "desc" | "descending" | "-1" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort on a single allow-listed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static SortField,
    pub order: SortOrder,
}

impl Default for Sort {
    fn default() -> Self {
        Self::by_flight_number(SortOrder::Asc)
    }
}

impl Sort {
    pub fn by_flight_number(order: SortOrder) -> Self {
        Self {
            field: &fields::SORT_FLIGHT_NUMBER,
            order,
        }
    }
}

/// Build the sort from `sort` and `order`.
///
/// Unknown fields fall back to `flight_number`, unknown orders to ascending.
pub fn build_sort(params: &QueryParams) -> Sort {
    let field = match params.get(SORT_KEY) {
        Some(name) => fields::sort_field(name.trim()).unwrap_or_else(|| {
            debug!(field = %name, "Unknown sort field, using flight_number");
            &fields::SORT_FLIGHT_NUMBER
        }),
        None => &fields::SORT_FLIGHT_NUMBER,
    };

    let order = params
        .get(ORDER_KEY)
        .and_then(|raw| SortOrder::parse(raw))
        .unwrap_or_default();

    Sort { field, order }
}
