//! Stub collection writer for tests.

use crate::client::{CollectionWriter, WriteError, WriteOutcome};
use crate::derive::DerivedFields;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Clone, Debug)]
pub enum StubResponse {
    Published(JsonValue),
    Rejected(StatusCode, JsonValue),
    TransportError,
}

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub item_id: String,
    pub fields: DerivedFields,
    pub at: Instant,
}

/// Records every write and answers with a canned response per item id.
///
/// Items without a configured response are published and echo back
/// `{"id": <item_id>}`.
#[derive(Default)]
pub struct StubWriter {
    responses: Mutex<HashMap<String, StubResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, item_id: &str, response: StubResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(item_id.to_string(), response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CollectionWriter for StubWriter {
    async fn publish_item(
        &self,
        item_id: &str,
        fields: &DerivedFields,
    ) -> Result<WriteOutcome, WriteError> {
        self.calls.lock().unwrap().push(RecordedCall {
            item_id: item_id.to_string(),
            fields: fields.clone(),
            at: Instant::now(),
        });

        let response = self.responses.lock().unwrap().get(item_id).cloned();
        match response {
            None => Ok(WriteOutcome::Published(json!({"id": item_id}))),
            Some(StubResponse::Published(item)) => Ok(WriteOutcome::Published(item)),
            Some(StubResponse::Rejected(status, body)) => Ok(WriteOutcome::Rejected { status, body }),
            Some(StubResponse::TransportError) => Err(transport_error()),
        }
    }
}

/// A genuine `reqwest::Error`, produced without touching the network.
fn transport_error() -> WriteError {
    let error = reqwest::Client::new()
        .get("http://")
        .build()
        .expect_err("an empty host is rejected");
    WriteError::Transport(error)
}
