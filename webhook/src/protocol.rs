//! Request and response bodies of the webhook server.

use dispatcher::protocol::null_as_default;
use dispatcher::{ItemFields, UpdateRequest, UpdateResultBatch};
use serde::{Deserialize, Serialize};

/// Body of a collection item webhook delivery.
///
/// # Example
/// ```json
/// {
///   "triggerType": "collection_item_created",
///   "payload": {
///     "id": "64f1c0ffee",
///     "isDraft": false,
///     "isArchived": false,
///     "fieldData": { "name": "acme corp", "slug": "acme-corp" }
///   }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub payload: Option<WebhookPayload>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "isDraft", default)]
    pub is_draft: Option<bool>,

    #[serde(rename = "isArchived", default)]
    pub is_archived: Option<bool>,

    #[serde(rename = "fieldData", default, deserialize_with = "null_as_default")]
    pub field_data: ItemFields,
}

impl WebhookPayload {
    /// Non-published items are never written back. Absent or null flags
    /// count as unset.
    pub fn is_published(&self) -> bool {
        !self.is_draft.unwrap_or(false) && !self.is_archived.unwrap_or(false)
    }

    /// Builds the update for the announced item. Only `name` and `slug` are
    /// carried over from the delivered field data.
    pub fn into_update_request(self, item_id: String) -> UpdateRequest {
        let fields = ItemFields {
            name: self.field_data.name,
            slug: self.field_data.slug,
            ..Default::default()
        };
        UpdateRequest::new(item_id, fields)
    }
}

/// Body of a directly submitted batch.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub items: Vec<UpdateRequest>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
    #[serde(rename = "updateResults")]
    pub update_results: UpdateResultBatch,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
