//! Error types for the runner module.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while running the analyzer.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Analyzer executable not found.
    #[error("Analyzer not found: {program}")]
    ProgramNotFound { program: String },

    /// The analyzer could not be started.
    #[error("Failed to start analyzer: {0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting for the analyzer failed.
    #[error("Failed to wait for analyzer: {0}")]
    Wait(#[source] std::io::Error),

    /// The analyzer ran past its time limit and was killed.
    #[error("Analyzer timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// A capture file could not be created or read back.
    #[error("Capture file {path} failed: {source}")]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The working directory could not be listed.
    #[error("Failed to list {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result file left by an earlier run could not be removed.
    #[error("Failed to remove stale result {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The analyzer exited unsuccessfully.
    #[error("Analyzer exited with {0}")]
    ExitStatus(ExitStatus),
}
