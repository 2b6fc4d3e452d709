//! Input download and result upload.

use std::path::Path;
use std::sync::Arc;

use crate::config::{TransferConfig, TransferMode};
use crate::job::{ArtifactNaming, ExecutionLog, JobParams};
use crate::storage::{StorageClient, StorageError};
use crate::workspace::list_files;

use super::layout::StorageLayout;

/// Files and bytes moved by one transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub files: usize,
    pub bytes: u64,
}

/// Fetches job inputs into the working directory and pushes results back.
///
/// Storage errors propagate unchanged; nothing is retried.
pub struct ArtifactTransfer {
    client: Arc<dyn StorageClient>,
    layout: StorageLayout,
    mode: TransferMode,
    naming: ArtifactNaming,
}

impl ArtifactTransfer {
    pub fn new(
        client: Arc<dyn StorageClient>,
        config: &TransferConfig,
        naming: ArtifactNaming,
    ) -> Self {
        Self {
            client,
            layout: StorageLayout::new(config),
            mode: config.mode,
            naming,
        }
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Downloads the job's input artifact(s) into `work_dir`.
    pub async fn fetch_inputs(
        &self,
        params: &JobParams,
        work_dir: &Path,
        log: &mut ExecutionLog,
    ) -> Result<TransferSummary, StorageError> {
        match self.mode {
            TransferMode::Single => {
                let file_name = self.naming.input_file_name(params);
                let key = self.layout.input_key(params, &file_name);
                let bytes = self.client.fetch(&key, &work_dir.join(&file_name)).await?;
                log.info(format!("transfer: fetched \"{}\" ({} bytes)", key, bytes));
                Ok(TransferSummary { files: 1, bytes })
            }
            TransferMode::Multi => {
                let collection = self.layout.input_collection(params);
                let mut names = self.client.list(&collection).await?;
                names.retain(|name| {
                    let local = is_local_file_name(name);
                    if !local {
                        log.warn(format!(
                            "transfer: skipped object \"{}\" in {}",
                            name, collection
                        ));
                    }
                    local
                });
                if names.is_empty() {
                    return Err(StorageError::NotFound(format!(
                        "{}/ contains no input objects",
                        collection
                    )));
                }

                let mut summary = TransferSummary::default();
                for name in names {
                    let key = format!("{}/{}", collection, name);
                    let bytes = self.client.fetch(&key, &work_dir.join(&name)).await?;
                    log.info(format!("transfer: fetched \"{}\" ({} bytes)", key, bytes));
                    summary.files += 1;
                    summary.bytes += bytes;
                }
                Ok(summary)
            }
        }
    }

    /// Uploads every result artifact found in `work_dir`.
    pub async fn push_outputs(
        &self,
        params: &JobParams,
        work_dir: &Path,
        log: &mut ExecutionLog,
    ) -> Result<TransferSummary, StorageError> {
        let collection = self.layout.output_collection(params);
        let mut summary = TransferSummary::default();

        for name in list_files(work_dir).await? {
            if !self.naming.is_result(&name) {
                continue;
            }
            let key = format!("{}/{}", collection, name);
            let bytes = self.client.put(&key, &work_dir.join(&name)).await?;
            log.info(format!("transfer: stored \"{}\" ({} bytes)", key, bytes));
            summary.files += 1;
            summary.bytes += bytes;
        }

        Ok(summary)
    }
}

/// Whether a remote object name can be used as a file name in the working directory.
fn is_local_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
