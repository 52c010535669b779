pub mod api;
pub mod config;
pub mod errors;
pub mod metrics_defs;
pub mod protocol;

use dispatcher::Dispatcher;
use errors::WebhookError;
use tokio::net::TcpListener;

/// Serves the webhook routes until the process receives Ctrl-C.
pub async fn run(config: config::Config, dispatcher: Dispatcher) -> Result<(), WebhookError> {
    let cors = api::cors_layer(config.cors.allowed_origin()?);
    let app = api::router(dispatcher, cors);

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
