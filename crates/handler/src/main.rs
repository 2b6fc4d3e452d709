mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visibility_core::{load_config, validate_config, JobHandler};

use cli::{read_request, Cli};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging; stdout carries the response only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!("visibility-handler {}", VERSION);

    // Load configuration
    match &cli.config {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No configuration file given, using defaults"),
    }
    let config = load_config(cli.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Working directory: {:?}", config.workspace.root);
    info!("Analyzer program: {}", config.analyzer.program);
    info!("Transfer mode: {:?}", config.transfer.mode);

    let raw = read_request(cli.request.as_deref()).await?;
    let request: Value = serde_json::from_str(&raw).context("Request is not valid JSON")?;

    let handler = JobHandler::new(config);
    let response = handler.handle(request).await;
    info!(
        result = ?response.result,
        log_lines = response.log.len(),
        "Job finished"
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .context("Failed to serialize response")?;
    println!("{}", output);

    Ok(())
}
