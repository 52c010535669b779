use crate::protocol::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Missing payload or item ID")]
    MissingPayload,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Update task failed: {0}")]
    DispatchFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::MissingPayload | WebhookError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            WebhookError::DispatchFailed(_) | WebhookError::Config(_) | WebhookError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Error handling webhook");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
