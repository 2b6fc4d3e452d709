//! Job-scoped filesystem layout.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::WorkspaceConfig;

const STDOUT_CAPTURE: &str = "pbout.txt";
const STDERR_CAPTURE: &str = "pberr.txt";

/// Paths a single job reads and writes on the local filesystem.
///
/// All paths are carried explicitly through the pipeline. With run isolation
/// disabled they are fixed, host-wide locations shared by every job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Staging directory for the input image and the analyzer's results.
    pub work_dir: PathBuf,
    /// File receiving the analyzer's standard output.
    pub stdout_path: PathBuf,
    /// File receiving the analyzer's standard error.
    pub stderr_path: PathBuf,
}

impl Workspace {
    /// Resolves the layout for one run.
    pub fn for_run(config: &WorkspaceConfig, run_id: &str) -> Self {
        if config.isolate_runs {
            Self {
                work_dir: config.root.join(run_id),
                stdout_path: config
                    .capture_dir
                    .join(format!("{}-{}", run_id, STDOUT_CAPTURE)),
                stderr_path: config
                    .capture_dir
                    .join(format!("{}-{}", run_id, STDERR_CAPTURE)),
            }
        } else {
            Self {
                work_dir: config.root.clone(),
                stdout_path: config.capture_dir.join(STDOUT_CAPTURE),
                stderr_path: config.capture_dir.join(STDERR_CAPTURE),
            }
        }
    }

    /// Creates the working directory if needed.
    ///
    /// Returns `true` when the directory was created by this call and `false`
    /// when it already existed.
    pub async fn prepare(&self) -> io::Result<bool> {
        let existed = tokio::fs::try_exists(&self.work_dir).await?;
        tokio::fs::create_dir_all(&self.work_dir).await?;
        if let Some(parent) = self.stdout_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if let Some(parent) = self.stderr_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(!existed)
    }
}

/// Names of the regular files directly inside `dir`, sorted.
pub async fn list_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    names.sort();
    Ok(names)
}
