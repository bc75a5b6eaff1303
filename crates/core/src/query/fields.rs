//! Allow-lists of client-addressable launch fields.
//!
//! Only fields listed here can be filtered or sorted on. Each filterable
//! field declares where it lives in a launch document and what type its
//! query-string value must coerce to.

/// Expected type of a filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// A date or date-time, normalized to `YYYY-MM-DDTHH:MM:SS.sssZ`.
    Date,
}

/// Where a field lives within a launch document.
///
/// Paths use SQLite JSON path syntax and are always static strings from
/// this module, never client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// Path from the document root.
    Document(&'static str),
    /// Path within any element of `rocket.second_stage.payloads`.
    Payload(&'static str),
    /// Array at this path, within any payload, contains the value.
    PayloadList(&'static str),
    /// Path within any element of `rocket.first_stage.cores`.
    Core(&'static str),
}

/// A filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Query-string key.
    pub key: &'static str,
    pub location: FieldLocation,
    pub kind: ValueKind,
}

impl FilterField {
    const fn new(key: &'static str, location: FieldLocation, kind: ValueKind) -> Self {
        Self {
            key,
            location,
            kind,
        }
    }
}

pub const PAYLOADS_PATH: &str = "$.rocket.second_stage.payloads";
pub const CORES_PATH: &str = "$.rocket.first_stage.cores";

pub const FLIGHT_NUMBER: FilterField = FilterField::new(
    "flight_number",
    FieldLocation::Document("$.flight_number"),
    ValueKind::Integer,
);

pub const UPCOMING: FilterField = FilterField::new(
    "upcoming",
    FieldLocation::Document("$.upcoming"),
    ValueKind::Boolean,
);

/// Target of the `start` / `end` range keys.
pub const LAUNCH_DATE: FilterField = FilterField::new(
    "launch_date_utc",
    FieldLocation::Document("$.launch_date_utc"),
    ValueKind::Date,
);

use self::FieldLocation::{Core, Document, Payload, PayloadList};
use self::ValueKind::{Boolean, Float, Integer, Text};

pub const FILTER_FIELDS: &[FilterField] = &[
    FLIGHT_NUMBER,
    UPCOMING,
    LAUNCH_DATE,
    FilterField::new("flight_id", Document("$.flight_id"), Text),
    FilterField::new("mission_name", Document("$.mission_name"), Text),
    FilterField::new("launch_year", Document("$.launch_year"), Text),
    FilterField::new("launch_success", Document("$.launch_success"), Boolean),
    FilterField::new("tbd", Document("$.tbd"), Boolean),
    FilterField::new("tentative", Document("$.is_tentative"), Boolean),
    FilterField::new("rocket_id", Document("$.rocket.rocket_id"), Text),
    FilterField::new("rocket_name", Document("$.rocket.rocket_name"), Text),
    FilterField::new("rocket_type", Document("$.rocket.rocket_type"), Text),
    FilterField::new("site_id", Document("$.launch_site.site_id"), Text),
    FilterField::new("site_name", Document("$.launch_site.site_name"), Text),
    FilterField::new("fairings_reused", Document("$.rocket.fairings.reused"), Boolean),
    FilterField::new(
        "fairings_recovered",
        Document("$.rocket.fairings.recovered"),
        Boolean,
    ),
    FilterField::new("fairings_ship", Document("$.rocket.fairings.ship"), Text),
    FilterField::new("core_serial", Core("$.core_serial"), Text),
    FilterField::new("core_flight", Core("$.flight"), Integer),
    FilterField::new("block", Core("$.block"), Integer),
    FilterField::new("gridfins", Core("$.gridfins"), Boolean),
    FilterField::new("legs", Core("$.legs"), Boolean),
    FilterField::new("core_reuse", Core("$.reused"), Boolean),
    FilterField::new("land_success", Core("$.land_success"), Boolean),
    FilterField::new("landing_intent", Core("$.landing_intent"), Boolean),
    FilterField::new("landing_type", Core("$.landing_type"), Text),
    FilterField::new("landing_vehicle", Core("$.landing_vehicle"), Text),
    FilterField::new("payload_id", Payload("$.payload_id"), Text),
    FilterField::new("payload_type", Payload("$.payload_type"), Text),
    FilterField::new("payload_mass_kg", Payload("$.payload_mass_kg"), Float),
    FilterField::new("cap_serial", Payload("$.cap_serial"), Text),
    FilterField::new("nationality", Payload("$.nationality"), Text),
    FilterField::new("manufacturer", Payload("$.manufacturer"), Text),
    FilterField::new("orbit", Payload("$.orbit"), Text),
    FilterField::new("reference_system", Payload("$.orbit_params.reference_system"), Text),
    FilterField::new("regime", Payload("$.orbit_params.regime"), Text),
    FilterField::new("norad_id", PayloadList("$.norad_id"), Integer),
    FilterField::new("customer", PayloadList("$.customers"), Text),
];

/// Find a filterable field by its query-string key.
pub fn filter_field(key: &str) -> Option<&'static FilterField> {
    FILTER_FIELDS.iter().find(|f| f.key == key)
}

/// A sortable, document-level field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub key: &'static str,
    /// JSON path from the document root.
    pub path: &'static str,
}

pub const SORT_FLIGHT_NUMBER: SortField = SortField {
    key: "flight_number",
    path: "$.flight_number",
};

pub const SORT_FIELDS: &[SortField] = &[
    SORT_FLIGHT_NUMBER,
    SortField {
        key: "launch_date_utc",
        path: "$.launch_date_utc",
    },
    SortField {
        key: "launch_date_unix",
        path: "$.launch_date_unix",
    },
    SortField {
        key: "launch_year",
        path: "$.launch_year",
    },
    SortField {
        key: "mission_name",
        path: "$.mission_name",
    },
    SortField {
        key: "launch_success",
        path: "$.launch_success",
    },
    SortField {
        key: "rocket_id",
        path: "$.rocket.rocket_id",
    },
    SortField {
        key: "site_id",
        path: "$.launch_site.site_id",
    },
];

/// Find a sortable field by its query-string name.
pub fn sort_field(key: &str) -> Option<&'static SortField> {
    SORT_FIELDS.iter().find(|f| f.key == key)
}

/// Fields that exist in storage but must never reach API consumers.
pub const INTERNAL_FIELDS: &[&str] = &["reuse"];
