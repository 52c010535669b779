use crate::errors::WebhookError;
use crate::metrics_defs::{BATCHES_RECEIVED, WEBHOOKS_RECEIVED};
use crate::protocol::{BatchRequest, MessageResponse, UpdateResponse, WebhookEnvelope};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dispatcher::derive::sort_key;
use dispatcher::{Dispatcher, UpdateRequest, UpdateResultBatch};
use shared::counter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const UPDATE_TRIGGERED: &str = "Update triggered";
const IGNORING_UNPUBLISHED: &str = "Ignoring draft/archived item";

#[derive(Clone)]
struct AppState {
    dispatcher: Dispatcher,
}

/// Builds the HTTP routes served by the webhook server.
pub fn router(dispatcher: Dispatcher, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", post(item_created))
        .route("/webflow-webhook", post(item_created))
        .route("/updates", post(submit_batch))
        .with_state(AppState { dispatcher })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

async fn health() -> &'static str {
    "Server is running!"
}

async fn item_created(
    State(state): State<AppState>,
    body: Result<Json<WebhookEnvelope>, JsonRejection>,
) -> Result<Response, WebhookError> {
    let Json(envelope) = body.map_err(|e| {
        counter!(WEBHOOKS_RECEIVED, "outcome" => "rejected").increment(1);
        WebhookError::InvalidBody(e.body_text())
    })?;

    let Some((payload, item_id)) = envelope
        .payload
        .and_then(|p| p.id.clone().filter(|id| !id.is_empty()).map(|id| (p, id)))
    else {
        counter!(WEBHOOKS_RECEIVED, "outcome" => "rejected").increment(1);
        return Err(WebhookError::MissingPayload);
    };

    if !payload.is_published() {
        tracing::info!(item_id = %item_id, "Ignoring draft/archived item");
        counter!(WEBHOOKS_RECEIVED, "outcome" => "ignored").increment(1);
        return Ok(Json(MessageResponse {
            message: IGNORING_UNPUBLISHED,
        })
        .into_response());
    }

    let request = payload.into_update_request(item_id);
    tracing::info!(
        item_id = %request.item_id,
        name = ?request.fields.name,
        sort_field = ?request.fields.name.as_deref().map(sort_key),
        "New item received"
    );
    counter!(WEBHOOKS_RECEIVED, "outcome" => "dispatched").increment(1);

    let update_results = run_dispatch(&state.dispatcher, vec![request]).await?;
    Ok(Json(UpdateResponse {
        message: UPDATE_TRIGGERED,
        update_results,
    })
    .into_response())
}

async fn submit_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Response, WebhookError> {
    let Json(batch) = body.map_err(|e| WebhookError::InvalidBody(e.body_text()))?;

    tracing::info!(items = batch.items.len(), "Update batch received");
    counter!(BATCHES_RECEIVED).increment(1);

    let update_results = run_dispatch(&state.dispatcher, batch.items).await?;
    Ok(Json(UpdateResponse {
        message: UPDATE_TRIGGERED,
        update_results,
    })
    .into_response())
}

/// Runs the dispatch on its own task so a panic while processing is reported
/// to the caller as a server error instead of dropping the connection.
async fn run_dispatch(
    dispatcher: &Dispatcher,
    requests: Vec<UpdateRequest>,
) -> Result<UpdateResultBatch, WebhookError> {
    let dispatcher = dispatcher.clone();
    tokio::spawn(async move { dispatcher.dispatch(requests).await })
        .await
        .map_err(|e| WebhookError::DispatchFailed(e.to_string()))
}
