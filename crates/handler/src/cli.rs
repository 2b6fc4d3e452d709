use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;

/// Runs one visibility job and prints the JSON response to stdout.
#[derive(Debug, Parser)]
#[command(name = "visibility-handler", version, about)]
pub struct Cli {
    /// Job request JSON file; stdin when omitted or "-"
    pub request: Option<PathBuf>,

    /// Handler configuration file (TOML)
    #[arg(short, long, env = "VISIBILITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

/// Reads the raw request from a file, or from stdin.
pub async fn read_request(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read request from {:?}", path)),
        _ => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read request from stdin")?;
            Ok(raw)
        }
    }
}
