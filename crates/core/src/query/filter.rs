//! Filter predicates built from query-string parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::debug;

use super::fields::{self, FieldLocation, FilterField, ValueKind};
use super::{QueryParams, RESERVED_KEYS};

/// Query-string key for the inclusive lower bound on `launch_date_utc`.
pub const RANGE_START_KEY: &str = "start";
/// Query-string key for the inclusive upper bound on `launch_date_utc`.
pub const RANGE_END_KEY: &str = "end";

/// A typed filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gte,
    Lte,
}

/// One condition on an allow-listed field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: &'static FilterField,
    pub comparison: Comparison,
    pub value: FilterValue,
}

impl Condition {
    pub fn eq(field: &'static FilterField, value: FilterValue) -> Self {
        Self {
            field,
            comparison: Comparison::Eq,
            value,
        }
    }

    pub fn location(&self) -> FieldLocation {
        self.field.location
    }
}

/// A conjunction of conditions. An empty filter matches every launch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching exactly one flight number.
    pub fn flight_number(flight_number: i64) -> Self {
        Self::new().with_base(Condition::eq(
            &fields::FLIGHT_NUMBER,
            FilterValue::Integer(flight_number),
        ))
    }

    /// Filter on the `upcoming` flag only.
    pub fn upcoming(upcoming: bool) -> Self {
        Self::new().with_upcoming(upcoming)
    }

    /// Merge a fixed base condition into this filter.
    ///
    /// Client conditions on the same field are discarded, so the base
    /// condition can never be overridden or contradicted.
    pub fn with_base(mut self, condition: Condition) -> Self {
        self.conditions.retain(|c| c.field.key != condition.field.key);
        self.conditions.push(condition);
        self
    }

    pub fn with_upcoming(self, upcoming: bool) -> Self {
        self.with_base(Condition::eq(
            &fields::UPCOMING,
            FilterValue::Boolean(upcoming),
        ))
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Build a filter from query-string parameters.
///
/// Reserved keys and keys outside the allow-list are ignored. A value that
/// does not coerce to the field's type drops the condition for that key.
pub fn build_filter(params: &QueryParams) -> Filter {
    let mut filter = Filter::new();

    for (key, raw) in params {
        let key = key.as_str();
        if RESERVED_KEYS.contains(&key) {
            continue;
        }

        let (field, comparison) = match key {
            RANGE_START_KEY => (&fields::LAUNCH_DATE, Comparison::Gte),
            RANGE_END_KEY => (&fields::LAUNCH_DATE, Comparison::Lte),
            _ => match fields::filter_field(key) {
                Some(field) => (field, Comparison::Eq),
                None => {
                    debug!(key, "Ignoring unknown filter key");
                    continue;
                }
            },
        };

        match coerce(field.kind, raw) {
            Some(value) => filter.push(Condition {
                field,
                comparison,
                value,
            }),
            None => debug!(key, value = %raw, "Dropping filter with malformed value"),
        }
    }

    filter
}

/// Coerce a raw query-string value into the expected type.
pub fn coerce(kind: ValueKind, raw: &str) -> Option<FilterValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match kind {
        ValueKind::Integer => raw.parse::<i64>().ok().map(FilterValue::Integer),
        ValueKind::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(FilterValue::Float),
        ValueKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(FilterValue::Boolean(true)),
            "false" | "0" => Some(FilterValue::Boolean(false)),
            _ => None,
        },
        ValueKind::Text => Some(FilterValue::Text(raw.to_string())),
        ValueKind::Date => normalize_date(raw).map(FilterValue::Text),
    }
}

/// Normalize a date or date-time string to `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// (taken as UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let parsed: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else if let Some(naive) = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        naive.and_utc()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
    };

    Some(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}
