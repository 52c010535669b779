use crate::client::{CollectionWriter, WriteOutcome};
use crate::derive::derive;
use crate::metrics_defs::{UPDATE_WRITE_DURATION, UPDATES_FAILED, UPDATES_SUCCEEDED};
use crate::protocol::{MISSING_REQUIRED_FIELDS, UpdateRequest, UpdateResult, UpdateResultBatch};
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Applies update requests to the remote collection one at a time.
///
/// Writes are never issued in parallel. After every successful write the
/// dispatcher waits for the pacing interval before touching the next item, which
/// keeps a batch under the remote API's rate limit. Failed items are not paced,
/// and nothing waits after the last item.
#[derive(Clone)]
pub struct Dispatcher {
    writer: Arc<dyn CollectionWriter>,
    pacing_interval: Duration,
}

impl Dispatcher {
    pub fn new(writer: Arc<dyn CollectionWriter>, pacing_interval: Duration) -> Self {
        Self {
            writer,
            pacing_interval,
        }
    }

    /// Processes every request in order and returns one result per request.
    ///
    /// A failure of one item, whether rejected locally, by the remote API, or
    /// at the transport level, is recorded in its result and never stops the
    /// rest of the batch.
    pub async fn dispatch(&self, requests: Vec<UpdateRequest>) -> UpdateResultBatch {
        let mut results = Vec::with_capacity(requests.len());
        let mut requests = requests.into_iter().peekable();

        while let Some(request) = requests.next() {
            let result = self.dispatch_one(request).await;
            let succeeded = result.success;
            results.push(result);

            if succeeded && requests.peek().is_some() {
                sleep(self.pacing_interval).await;
            }
        }

        results
    }

    async fn dispatch_one(&self, request: UpdateRequest) -> UpdateResult {
        let UpdateRequest { item_id, fields } = request;

        let Some((name, slug)) = fields.required().filter(|_| !item_id.is_empty()) else {
            tracing::warn!(item_id = %item_id, "Rejecting update with missing required fields");
            counter!(UPDATES_FAILED, "reason" => "missing_fields").increment(1);
            return UpdateResult::failed(item_id, MISSING_REQUIRED_FIELDS);
        };

        let derived = derive(name, slug, &fields.extra_fields);

        let start = Instant::now();
        let outcome = self.writer.publish_item(&item_id, &derived).await;
        histogram!(UPDATE_WRITE_DURATION).record(start.elapsed().as_secs_f64());

        match outcome {
            Ok(WriteOutcome::Published(item)) => {
                tracing::info!(item_id = %item_id, sort_key = %derived.sort_key, "Updated item");
                counter!(UPDATES_SUCCEEDED).increment(1);
                UpdateResult::succeeded(item_id, item)
            }
            Ok(WriteOutcome::Rejected { status, body }) => {
                tracing::error!(
                    item_id = %item_id,
                    status = %status,
                    error = %body,
                    "Update failed"
                );
                counter!(UPDATES_FAILED, "reason" => "remote").increment(1);
                UpdateResult::failed(item_id, body)
            }
            Err(e) => {
                tracing::error!(item_id = %item_id, error = %e, "Network error on update");
                counter!(UPDATES_FAILED, "reason" => "transport").increment(1);
                UpdateResult::failed(item_id, e.to_string())
            }
        }
    }
}
