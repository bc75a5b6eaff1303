//! Field projection (response shaping).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::fields::INTERNAL_FIELDS;
use super::QueryParams;

/// Query-string key listing the fields to return.
pub const FIELDS_KEY: &str = "fields";
/// Older spelling of [`FIELDS_KEY`], still accepted.
pub const FIELDS_ALIAS_KEY: &str = "filter";

/// Upper bound on requested fields; extra names are ignored.
pub const MAX_PROJECTION_FIELDS: usize = 64;

static FIELD_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)*$").expect("valid field path regex"));

/// Which fields of a launch document to return.
///
/// `None` returns every field. Internal fields are removed in both cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Option<Vec<String>>,
}

impl Projection {
    /// Projection returning every (non-internal) field.
    pub fn all() -> Self {
        Self { fields: None }
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Shape a stored document for a response.
    pub fn apply(&self, mut document: Value) -> Value {
        strip_internal(&mut document);

        let Some(fields) = &self.fields else {
            return document;
        };

        let mut tree = PathTree::default();
        for path in fields {
            tree.insert(path.split('.'));
        }
        tree.project(&document).unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// Remove internal fields from the top level of a document.
pub fn strip_internal(document: &mut Value) {
    if let Value::Object(map) = document {
        for field in INTERNAL_FIELDS {
            map.remove(*field);
        }
    }
}

/// Requested paths merged by shared prefix.
#[derive(Debug, Default)]
struct PathTree {
    /// The whole value at this node is requested.
    whole: bool,
    children: BTreeMap<String, PathTree>,
}

impl PathTree {
    fn insert<'a>(&mut self, mut segments: impl Iterator<Item = &'a str>) {
        if self.whole {
            return;
        }
        match segments.next() {
            Some(head) => self
                .children
                .entry(head.to_string())
                .or_default()
                .insert(segments),
            None => {
                self.whole = true;
                self.children.clear();
            }
        }
    }

    /// Project `value` onto this tree. `None` when nothing requested exists.
    ///
    /// Arrays are walked element by element, so `payloads.payload_id`
    /// selects the id of every payload.
    fn project(&self, value: &Value) -> Option<Value> {
        if self.whole {
            return Some(value.clone());
        }

        match value {
            Value::Object(map) => {
                let projected: Map<String, Value> = self
                    .children
                    .iter()
                    .filter_map(|(key, child)| {
                        let value = child.project(map.get(key)?)?;
                        Some((key.clone(), value))
                    })
                    .collect();
                (!projected.is_empty()).then_some(Value::Object(projected))
            }
            Value::Array(items) => {
                let projected: Vec<Value> =
                    items.iter().filter_map(|item| self.project(item)).collect();
                (!projected.is_empty()).then_some(Value::Array(projected))
            }
            _ => None,
        }
    }
}

fn is_internal(path: &str) -> bool {
    let root = path.split('.').next().unwrap_or(path);
    INTERNAL_FIELDS.contains(&root)
}

/// Build a projection from the `fields` (or `filter`) parameter.
///
/// Absent, empty or entirely invalid lists fall back to returning every
/// field.
pub fn build_projection(params: &QueryParams) -> Projection {
    let Some(raw) = params
        .get(FIELDS_KEY)
        .or_else(|| params.get(FIELDS_ALIAS_KEY))
    else {
        return Projection::all();
    };

    let mut fields: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !FIELD_PATH.is_match(name) || is_internal(name) {
            debug!(field = name, "Dropping invalid projection field");
            continue;
        }
        if fields.len() >= MAX_PROJECTION_FIELDS {
            break;
        }
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }

    if fields.is_empty() {
        Projection::all()
    } else {
        Projection {
            fields: Some(fields),
        }
    }
}
