use clap::{Args, Parser};
use dispatcher::{Dispatcher, UpdateRequest, WebflowClient};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

mod config;
mod logging;
mod statsd;

use config::Config;

/// Keeps the sort field of newly created collection items in sync.
#[derive(Parser)]
#[command(name = "itemsync", version)]
enum CliCommand {
    /// Run the webhook server
    Serve(ServeArgs),
    /// Apply the updates listed in a JSON file and print the results
    Update(UpdateArgs),
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long)]
    config_file_path: PathBuf,
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    config_file_path: PathBuf,
    /// JSON array of `{"itemId": ..., "fields": {"name": ..., "slug": ...}}`
    #[arg(long)]
    input: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("metrics error: {0}")]
    Metrics(#[from] statsd::MetricsError),
    #[error("could not create CMS client: {0}")]
    Client(#[from] dispatcher::WriteError),
    #[error("server error: {0}")]
    Server(#[from] webhook::errors::WebhookError),
    #[error("could not read input: {0}")]
    Input(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = CliCommand::parse();

    let config_path = match &cli {
        CliCommand::Serve(args) => &args.config_file_path,
        CliCommand::Update(args) => &args.config_file_path,
    };

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = logging::init(config.common.logging.as_ref());

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        match cli {
            CliCommand::Serve(_) => serve(config).await.map(|_| ExitCode::SUCCESS),
            CliCommand::Update(args) => update(config, &args.input).await,
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            ExitCode::FAILURE
        }
    }
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher, CliError> {
    let client = WebflowClient::new(&config.cms)?;
    Ok(Dispatcher::new(
        Arc::new(client),
        config.dispatch.pacing_interval(),
    ))
}

async fn serve(config: Config) -> Result<(), CliError> {
    if let Some(metrics_config) = &config.common.metrics {
        statsd::init(metrics_config)?;
    }

    let dispatcher = build_dispatcher(&config)?;
    tracing::info!(collection_id = %config.cms.collection_id, "Starting webhook server");
    webhook::run(config.webhook(), dispatcher).await?;
    Ok(())
}

async fn update(config: Config, input: &Path) -> Result<ExitCode, CliError> {
    let data = tokio::fs::read(input).await?;
    let requests: Vec<UpdateRequest> = serde_json::from_slice(&data)?;

    let dispatcher = build_dispatcher(&config)?;
    tracing::info!(items = requests.len(), "Dispatching updates");
    let results = dispatcher.dispatch(requests).await;

    println!("{}", serde_json::to_string_pretty(&results)?);

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "Some updates failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
