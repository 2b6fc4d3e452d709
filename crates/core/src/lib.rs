//! Serverless visibility job handler.
//!
//! Given an observation instant and camera orientation, a job downloads the
//! source image from WebDAV storage, runs the external visibility analyzer on
//! it, uploads the analyzer's results and answers with a JSON envelope
//! carrying the request, the outcome and the execution log.

pub mod config;
pub mod handler;
pub mod job;
pub mod runner;
pub mod storage;
pub mod testing;
pub mod transfer;
pub mod workspace;

pub use config::{
    load_config, load_config_from_str, validate_config, AnalyzerConfig, ConfigError,
    HandlerConfig, TransferConfig, TransferMode, WorkspaceConfig,
};
pub use handler::{JobError, JobHandler, VisibilityJob};
pub use job::{
    ArtifactNaming, ExecutionLog, JobParams, JobRequest, JobResponse, JobValue, LogEntry,
    LogLevel, Orientation, RequestError, ResultKind,
};
pub use runner::{AnalyzerRunner, RunnerError};
pub use storage::{
    create_storage_client, StorageBackend, StorageClient, StorageConfig, StorageConnector,
    StorageError, WebDavClient, WebDavConnector,
};
pub use transfer::{ArtifactTransfer, StorageLayout, TransferSummary};
pub use workspace::{list_files, Workspace};
