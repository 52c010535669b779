use crate::config::CmsConfig;
use crate::derive::DerivedFields;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid item URL: {0}")]
    InvalidUrl(String),
}

/// Response of the remote API to a write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// 2xx response carrying the updated item.
    Published(JsonValue),
    /// Any other status, with the parsed error body.
    Rejected { status: StatusCode, body: JsonValue },
}

/// Writes derived fields to a remote collection item.
#[async_trait]
pub trait CollectionWriter: Send + Sync {
    /// Updates the live version of an item. Must not retry.
    async fn publish_item(
        &self,
        item_id: &str,
        fields: &DerivedFields,
    ) -> Result<WriteOutcome, WriteError>;
}

#[derive(Serialize)]
struct PublishBody<'a> {
    #[serde(rename = "fieldData")]
    field_data: &'a DerivedFields,
}

/// Webflow CMS v2 client for the live item endpoint.
#[derive(Clone)]
pub struct WebflowClient {
    client: reqwest::Client,
    base_url: Url,
    collection_id: String,
    api_token: String,
    accept_version: String,
}

impl WebflowClient {
    pub fn new(config: &CmsConfig) -> Result<Self, WriteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(WebflowClient {
            client,
            base_url: config.api_base_url.clone(),
            collection_id: config.collection_id.clone(),
            api_token: config.api_token.clone().unwrap_or_default(),
            accept_version: config.accept_version.clone(),
        })
    }

    /// `{base}/collections/{collection_id}/items/{item_id}/live`
    fn item_url(&self, item_id: &str) -> Result<Url, WriteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WriteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["collections", self.collection_id.as_str(), "items", item_id, "live"]);
        Ok(url)
    }
}

#[async_trait]
impl CollectionWriter for WebflowClient {
    async fn publish_item(
        &self,
        item_id: &str,
        fields: &DerivedFields,
    ) -> Result<WriteOutcome, WriteError> {
        let url = self.item_url(item_id)?;

        let response = self
            .client
            .patch(url)
            .bearer_auth(&self.api_token)
            .header("accept-version", &self.accept_version)
            .json(&PublishBody { field_data: fields })
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<JsonValue>().await?;

        if status.is_success() {
            Ok(WriteOutcome::Published(body))
        } else {
            Ok(WriteOutcome::Rejected { status, body })
        }
    }
}
