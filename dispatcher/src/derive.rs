//! Derivation of the fields written back to the collection.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Collection field slug holding the uppercase sort key.
pub const SORT_FIELD: &str = "sort-field";
const ARCHIVED_FIELD: &str = "_archived";
const DRAFT_FIELD: &str = "_draft";

/// Field data sent to the remote API for a single item.
///
/// Serializes to the collection's field slugs:
/// ```json
/// {
///   "name": "acme corp",
///   "slug": "acme-corp",
///   "sort-field": "ACME CORP",
///   "_archived": false,
///   "_draft": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub name: String,
    pub slug: String,

    #[serde(rename = "sort-field")]
    pub sort_key: String,

    #[serde(rename = "_archived")]
    pub archived: bool,

    #[serde(rename = "_draft")]
    pub draft: bool,

    #[serde(flatten)]
    pub extra_fields: HashMap<String, JsonValue>,
}

/// Computes the fields written back for an item.
///
/// The sort key is the uppercase form of `name`, and the item is always
/// promoted to the live state. Opaque fields are copied as-is, except for keys
/// that collide with the derived ones.
pub fn derive(name: &str, slug: &str, extra_fields: &HashMap<String, JsonValue>) -> DerivedFields {
    let extra_fields = extra_fields
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    DerivedFields {
        name: name.to_string(),
        slug: slug.to_string(),
        sort_key: sort_key(name),
        archived: false,
        draft: false,
        extra_fields,
    }
}

pub fn sort_key(name: &str) -> String {
    name.to_uppercase()
}

fn is_reserved(key: &str) -> bool {
    matches!(key, "name" | "slug" | SORT_FIELD | ARCHIVED_FIELD | DRAFT_FIELD)
}
