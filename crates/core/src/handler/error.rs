//! Error types for job orchestration.

use std::path::PathBuf;
use thiserror::Error;

use crate::job::RequestError;
use crate::runner::RunnerError;
use crate::storage::StorageError;

/// Any failure that aborts a job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to create working directory {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only raised when subprocess failures are configured to be reported.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}
