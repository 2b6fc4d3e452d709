//! Analyzer process management.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration};

use super::error::RunnerError;
use crate::config::AnalyzerConfig;
use crate::job::{ArtifactNaming, ExecutionLog, JobParams};
use crate::workspace::{list_files, Workspace};

/// Launches the external visibility analyzer for one job.
pub struct AnalyzerRunner {
    config: AnalyzerConfig,
    naming: ArtifactNaming,
}

impl AnalyzerRunner {
    /// Creates a runner with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        let naming = ArtifactNaming::new(&config);
        Self { config, naming }
    }

    /// Creates a runner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AnalyzerConfig::default())
    }

    pub fn naming(&self) -> &ArtifactNaming {
        &self.naming
    }

    /// Path of the input image inside the working directory.
    pub fn input_path(&self, params: &JobParams, work_dir: &Path) -> PathBuf {
        work_dir.join(self.naming.input_file_name(params))
    }

    /// Builds the full argument vector (without the program itself).
    ///
    /// After the configured leading arguments come, in order: input image,
    /// output directory, output name stem, `pan-azimuth` (only when the job
    /// has an orientation), image generation flag, automated-mode config
    /// directory, prevailing visibility config file.
    pub fn build_args(&self, params: &JobParams, work_dir: &Path) -> Vec<String> {
        let mut args = self.config.leading_args.clone();

        args.push(self.input_path(params, work_dir).to_string_lossy().to_string());
        args.push(work_dir.to_string_lossy().to_string());
        args.push(self.naming.result_name().to_string());
        if let Some(pan_azimuth) = params.pan_azimuth() {
            args.push(pan_azimuth);
        }
        args.push(self.generate_image_flag().to_string());
        args.push(self.config.cfg_automated.clone());
        args.push(self.config.cfg_prevailing_visibility.clone());

        args
    }

    fn generate_image_flag(&self) -> &'static str {
        if self.config.generate_image {
            "1"
        } else {
            "0"
        }
    }

    /// Runs the analyzer to completion.
    ///
    /// Launch, wait and capture failures, a timeout, and an unsuccessful
    /// exit are written to the log. They are returned as errors only when
    /// `report_subprocess_failure` is enabled; otherwise the job carries on.
    pub async fn execute(
        &self,
        params: &JobParams,
        workspace: &Workspace,
        log: &mut ExecutionLog,
    ) -> Result<(), RunnerError> {
        let args = self.build_args(params, &workspace.work_dir);

        log.info(format!(
            "runner: analyzer parameters:\n\
             program: {}\n\
             input image: {}\n\
             result path: {}\n\
             result name: {}\n\
             pan-azimuth: {}\n\
             generate image (1-yes/0-no): {}\n\
             automated cfg: {}\n\
             prevailing visibility cfg: {}",
            self.config.program,
            self.input_path(params, &workspace.work_dir).display(),
            workspace.work_dir.display(),
            self.naming.result_name(),
            params.pan_azimuth().as_deref().unwrap_or("-"),
            self.generate_image_flag(),
            self.config.cfg_automated,
            self.config.cfg_prevailing_visibility,
        ));
        self.remove_stale_results(&workspace.work_dir, log).await?;
        log.info("runner: executing...");

        let failure = match self.run(&args, workspace, log).await {
            Ok(status) if status.success() => {
                log.info(format!("runner: analyzer exited with {}", status));
                None
            }
            Ok(status) => {
                log.warn(format!("runner: analyzer exited with {}", status));
                Some(RunnerError::ExitStatus(status))
            }
            Err(e) => {
                log.error(format!("runner: process failed: {}", e));
                Some(e)
            }
        };

        log.info("runner: done");

        match failure {
            Some(e) if self.config.report_subprocess_failure => Err(e),
            _ => Ok(()),
        }
    }

    /// Deletes result files left in the working directory by earlier runs.
    ///
    /// Errors are returned regardless of `report_subprocess_failure`.
    async fn remove_stale_results(
        &self,
        work_dir: &Path,
        log: &mut ExecutionLog,
    ) -> Result<(), RunnerError> {
        let names = list_files(work_dir)
            .await
            .map_err(|source| RunnerError::Listing {
                path: work_dir.to_path_buf(),
                source,
            })?;

        for name in names.into_iter().filter(|n| self.naming.is_result(n)) {
            let path = work_dir.join(&name);
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| RunnerError::Cleanup { path, source })?;
            log.info(format!("runner: removed stale result \"{}\"", name));
        }
        Ok(())
    }

    async fn run(
        &self,
        args: &[String],
        workspace: &Workspace,
        log: &mut ExecutionLog,
    ) -> Result<ExitStatus, RunnerError> {
        log_listing("before", &workspace.work_dir, log).await?;

        let stdout = create_capture(&workspace.stdout_path)?;
        let stderr = create_capture(&workspace.stderr_path)?;

        let mut child = Command::new(&self.config.program)
            .args(args)
            .current_dir(&workspace.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RunnerError::ProgramNotFound {
                        program: self.config.program.clone(),
                    }
                } else {
                    RunnerError::Spawn(e)
                }
            })?;

        log.info("runner: waiting for analyzer");
        let waited = self.wait(&mut child).await;
        log.info("runner: analyzer finished");

        // Diagnostics are collected even when the wait failed or timed out.
        let diagnostics = log_diagnostics(workspace, log).await;
        let status = waited?;
        diagnostics?;

        Ok(status)
    }

    async fn wait(&self, child: &mut Child) -> Result<ExitStatus, RunnerError> {
        if self.config.timeout_secs == 0 {
            return child.wait().await.map_err(RunnerError::Wait);
        }

        match timeout(Duration::from_secs(self.config.timeout_secs), child.wait()).await {
            Ok(result) => result.map_err(RunnerError::Wait),
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                Err(RunnerError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        }
    }
}

fn create_capture(path: &Path) -> Result<File, RunnerError> {
    File::create(path).map_err(|source| RunnerError::Capture {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_capture(path: &Path) -> Result<String, RunnerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RunnerError::Capture {
            path: path.to_path_buf(),
            source,
        })?;

    let text = String::from_utf8_lossy(&bytes);
    let trimmed = match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => &text,
    };
    Ok(trimmed.to_string())
}

async fn log_listing(label: &str, dir: &Path, log: &mut ExecutionLog) -> Result<(), RunnerError> {
    let names = list_files(dir).await.map_err(|source| RunnerError::Listing {
        path: dir.to_path_buf(),
        source,
    })?;
    for name in names {
        log.info(format!("runner: {} file \"{}\"", label, name));
    }
    Ok(())
}

async fn log_diagnostics(workspace: &Workspace, log: &mut ExecutionLog) -> Result<(), RunnerError> {
    log_listing("after", &workspace.work_dir, log).await?;

    let stderr = read_capture(&workspace.stderr_path).await?;
    log.info(format!("runner: stderr: {}", stderr));
    let stdout = read_capture(&workspace.stdout_path).await?;
    log.info(format!("runner: stdout: {}", stdout));

    Ok(())
}
