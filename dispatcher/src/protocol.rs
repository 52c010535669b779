//! Request and result types for collection item updates.
//!
//! Field names follow the Webflow CMS v2 wire format: requests and results use
//! camelCase keys, derived item fields use the collection's field slugs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Error recorded for requests that are rejected before any network call.
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// A pending update for a single collection item.
///
/// # Example
/// ```json
/// {
///   "itemId": "64f1c0ffee",
///   "fields": { "name": "acme corp", "slug": "acme-corp" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Identifier of the remote collection item. Empty means missing.
    #[serde(rename = "itemId", default, deserialize_with = "null_as_default")]
    pub item_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: ItemFields,
}

impl UpdateRequest {
    pub fn new(item_id: impl Into<String>, fields: ItemFields) -> Self {
        Self {
            item_id: item_id.into(),
            fields,
        }
    }
}

/// Deserializes an explicit `null` the same way as an absent key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Item fields carried by an update request.
///
/// `name` and `slug` are required by the dispatcher; every other field is
/// passed through to the remote API untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(flatten)]
    pub extra_fields: HashMap<String, JsonValue>,
}

impl ItemFields {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            slug: Some(slug.into()),
            extra_fields: HashMap::new(),
        }
    }

    /// Returns `name` and `slug` when both are present and non-empty.
    pub fn required(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        let slug = self.slug.as_deref().filter(|s| !s.is_empty())?;
        Some((name, slug))
    }
}

/// Outcome of one update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    #[serde(rename = "itemId")]
    pub item_id: String,

    pub success: bool,

    /// Item body returned by the remote API on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<JsonValue>,

    /// Either a message or the error body returned by the remote API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonValue>,
}

impl UpdateResult {
    pub fn succeeded(item_id: impl Into<String>, item: JsonValue) -> Self {
        Self {
            item_id: item_id.into(),
            success: true,
            item: Some(item),
            error: None,
        }
    }

    pub fn failed(item_id: impl Into<String>, error: impl Into<JsonValue>) -> Self {
        Self {
            item_id: item_id.into(),
            success: false,
            item: None,
            error: Some(error.into()),
        }
    }
}

/// Results of a dispatch call, in the same order as the requests.
pub type UpdateResultBatch = Vec<UpdateResult>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_deserialization() {
        let request: UpdateRequest = serde_json::from_value(json!({
            "itemId": "abc123",
            "fields": {
                "name": "foo",
                "slug": "foo",
                "category": "vendors"
            }
        }))
        .unwrap();

        assert_eq!(request.item_id, "abc123");
        assert_eq!(request.fields.required(), Some(("foo", "foo")));
        assert_eq!(
            request.fields.extra_fields.get("category"),
            Some(&json!("vendors"))
        );
    }

    #[test]
    fn test_request_with_missing_parts() {
        let request: UpdateRequest = serde_json::from_value(json!({"fields": {"name": "foo"}})).unwrap();
        assert!(request.item_id.is_empty());
        assert_eq!(request.fields.required(), None);

        let request: UpdateRequest = serde_json::from_value(json!({"itemId": "abc"})).unwrap();
        assert_eq!(request.fields, ItemFields::default());
    }

    #[test]
    fn test_null_parts_are_missing() {
        let request: UpdateRequest =
            serde_json::from_value(json!({"itemId": null, "fields": {"name": "foo", "slug": "foo"}}))
                .unwrap();
        assert!(request.item_id.is_empty());

        let request: UpdateRequest =
            serde_json::from_value(json!({"itemId": "abc", "fields": null})).unwrap();
        assert_eq!(request.item_id, "abc");
        assert_eq!(request.fields, ItemFields::default());

        let request: UpdateRequest =
            serde_json::from_value(json!({"itemId": "abc", "fields": {"name": null, "slug": "foo"}}))
                .unwrap();
        assert_eq!(request.fields.required(), None);
    }

    #[test]
    fn test_empty_required_fields_are_missing() {
        assert_eq!(ItemFields::new("", "slug").required(), None);
        assert_eq!(ItemFields::new("name", "").required(), None);
    }

    #[test]
    fn test_result_serialization_omits_absent_fields() {
        let ok = serde_json::to_value(UpdateResult::succeeded("abc123", json!({"id": "abc123"}))).unwrap();
        assert_eq!(
            ok,
            json!({"itemId": "abc123", "success": true, "item": {"id": "abc123"}})
        );

        let failed = serde_json::to_value(UpdateResult::failed("", MISSING_REQUIRED_FIELDS)).unwrap();
        assert_eq!(
            failed,
            json!({"itemId": "", "success": false, "error": "Missing required fields"})
        );
    }
}
