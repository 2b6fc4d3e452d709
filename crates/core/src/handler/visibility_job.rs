//! State of a single job run.

use serde_json::Value;
use uuid::Uuid;

use crate::job::{ExecutionLog, JobParams, JobRequest, JobValue, RequestError};
use crate::storage::StorageConfig;

/// One observation's download, analysis and upload.
///
/// Owns the execution log for its run; the log exists as soon as the job
/// does and is never shared with another job.
#[derive(Debug)]
pub struct VisibilityJob {
    run_id: String,
    params: JobParams,
    storage: StorageConfig,
    log: ExecutionLog,
}

impl VisibilityJob {
    /// Creates a job and logs its creation.
    pub fn new(request: JobRequest, run_id: impl Into<String>) -> Self {
        let run_id = run_id.into();
        let mut log = ExecutionLog::new();
        log.info(format!(
            "job: created visibility job {} for {}",
            run_id, request.params
        ));

        Self {
            run_id,
            params: request.params,
            storage: request.storage,
            log,
        }
    }

    /// Parses a raw request into a job with a fresh run id.
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let request = JobRequest::from_value(value)?;
        Ok(Self::new(request, Uuid::new_v4().to_string()))
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn params(&self) -> &JobParams {
        &self.params
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn log(&self) -> &ExecutionLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ExecutionLog {
        &mut self.log
    }

    /// Result payload of a completed run.
    ///
    /// The analyzer's findings live in the uploaded files, not here.
    pub fn result(&self) -> JobValue {
        JobValue::ok()
    }

    pub fn into_log(self) -> ExecutionLog {
        self.log
    }
}
