//! The job handler: request in, response out.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info_span, warn, Instrument};

use super::error::JobError;
use super::visibility_job::VisibilityJob;
use crate::config::{HandlerConfig, TransferMode};
use crate::job::{JobResponse, JobValue};
use crate::runner::AnalyzerRunner;
use crate::storage::{StorageConnector, WebDavConnector};
use crate::transfer::ArtifactTransfer;
use crate::workspace::Workspace;

/// Runs one job per request and converts every failure into a response.
pub struct JobHandler {
    config: HandlerConfig,
    connector: Arc<dyn StorageConnector>,
    runner: AnalyzerRunner,
}

impl JobHandler {
    /// Creates a handler talking to WebDAV storage.
    pub fn new(config: HandlerConfig) -> Self {
        let connector = Arc::new(WebDavConnector::new(Duration::from_secs(
            config.transfer.timeout_secs,
        )));
        Self::with_connector(config, connector)
    }

    /// Creates a handler obtaining storage clients from `connector`.
    pub fn with_connector(config: HandlerConfig, connector: Arc<dyn StorageConnector>) -> Self {
        let runner = AnalyzerRunner::new(config.analyzer.clone());
        Self {
            config,
            connector,
            runner,
        }
    }

    /// Handles one request. Never fails: errors become `"exception"` responses.
    pub async fn handle(&self, request: Value) -> JobResponse {
        let mut job = match VisibilityJob::from_value(&request) {
            Ok(job) => job,
            Err(e) => {
                warn!(error = %e, "Rejected job request");
                // No job, so no log yet
                return JobResponse::exception(request, &e, Vec::new());
            }
        };

        let span = info_span!("job", run_id = %job.run_id());
        let outcome = self.run_job(&mut job).instrument(span.clone()).await;

        if let Err(e) = &outcome {
            let _entered = span.enter();
            job.log_mut().error(format!("job: failed: {}", e));
        }

        let log = job.into_log().into_lines();
        match outcome {
            Ok(value) => JobResponse::value(request, value, log),
            Err(e) => JobResponse::exception(request, &e, log),
        }
    }

    /// Runs the download, execute and upload phases in order.
    ///
    /// The first failing phase aborts the rest.
    pub async fn run_job(&self, job: &mut VisibilityJob) -> Result<JobValue, JobError> {
        let workspace = Workspace::for_run(&self.config.workspace, job.run_id());
        let params = *job.params();
        let storage = job.storage().clone();
        let log = job.log_mut();

        log.info("job: creating working directory");
        let created = workspace
            .prepare()
            .await
            .map_err(|source| JobError::Workspace {
                path: workspace.work_dir.clone(),
                source,
            })?;
        log.info(format!(
            "job: working directory {} {}",
            workspace.work_dir.display(),
            if created { "created" } else { "not created" }
        ));

        log.info(format!(
            "job: connecting to {} storage at {}",
            storage.kind, storage.url
        ));
        let client = self.connector.connect(&storage)?;
        let transfer = ArtifactTransfer::new(
            client,
            &self.config.transfer,
            self.runner.naming().clone(),
        );

        log.info("job: downloading input data");
        let fetched = transfer
            .fetch_inputs(&params, &workspace.work_dir, log)
            .await?;
        match transfer.mode() {
            TransferMode::Single => {
                log.info(format!("job: downloaded {} bytes", fetched.bytes));
            }
            TransferMode::Multi => log.info(format!(
                "job: downloaded {} files ({} bytes)",
                fetched.files, fetched.bytes
            )),
        }

        log.info("job: starting execution");
        self.runner.execute(&params, &workspace, log).await?;

        log.info("job: uploading output data");
        let pushed = transfer
            .push_outputs(&params, &workspace.work_dir, log)
            .await?;
        log.info(format!("job: uploaded {} files", pushed.files));

        log.info("job: finished OK");
        Ok(job.result())
    }
}
