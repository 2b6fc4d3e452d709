use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Local filesystem layout of a job.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Staging directory for input and output artifacts.
    #[serde(default = "default_workspace_root")]
    pub root: PathBuf,
    /// Directory holding the redirected stdout/stderr of the analyzer.
    #[serde(default = "default_capture_dir")]
    pub capture_dir: PathBuf,
    /// Namespace the working directory and capture files by run id.
    ///
    /// With the default (`false`) every job on the host shares the same
    /// paths, so at most one job may run per host at a time.
    #[serde(default)]
    pub isolate_runs: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
            capture_dir: default_capture_dir(),
            isolate_runs: false,
        }
    }
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir().join("visibilityHandler")
}

fn default_capture_dir() -> PathBuf {
    std::env::temp_dir()
}

/// External visibility analyzer invocation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    /// Executable to launch.
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the positional job arguments.
    #[serde(default = "default_leading_args")]
    pub leading_args: Vec<String>,
    /// Prefix of the input image filename.
    #[serde(default = "default_input_prefix")]
    pub input_prefix: String,
    /// Extension of the input image filename (without dot).
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    /// Zero-pad month/day/hour/minute in the input filename.
    #[serde(default)]
    pub pad_input_timestamp: bool,
    /// Output name stem passed to the analyzer; uploads match this prefix.
    #[serde(default = "default_result_name")]
    pub result_name: String,
    /// Ask the analyzer to render an annotated image.
    #[serde(default = "default_true")]
    pub generate_image: bool,
    /// Directory with the automated-mode configuration.
    #[serde(default = "default_cfg_automated")]
    pub cfg_automated: String,
    /// Prevailing visibility configuration file.
    #[serde(default = "default_cfg_prevailing_visibility")]
    pub cfg_prevailing_visibility: String,
    /// Upper bound on the analyzer run time in seconds; 0 waits forever.
    #[serde(default = "default_analyzer_timeout")]
    pub timeout_secs: u64,
    /// Fail the job when the analyzer cannot be run or exits unsuccessfully.
    #[serde(default)]
    pub report_subprocess_failure: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            leading_args: default_leading_args(),
            input_prefix: default_input_prefix(),
            input_extension: default_input_extension(),
            pad_input_timestamp: false,
            result_name: default_result_name(),
            generate_image: true,
            cfg_automated: default_cfg_automated(),
            cfg_prevailing_visibility: default_cfg_prevailing_visibility(),
            timeout_secs: default_analyzer_timeout(),
            report_subprocess_failure: false,
        }
    }
}

fn default_program() -> String {
    "java".to_string()
}

fn default_leading_args() -> Vec<String> {
    vec![
        "-cp".to_string(),
        "/javaAction/libs/ImageVisibilityHandler-jar-with-dependencies.jar:/javaAction/libs/opencv-4.4.0-natives-linux-amd64.jar".to_string(),
        "com.microstepmis.remoteObserver.visibility.automated.ImageVisibilityHandler".to_string(),
    ]
}

fn default_input_prefix() -> String {
    "panasonic_fullhd_01".to_string()
}

fn default_input_extension() -> String {
    "jpg".to_string()
}

fn default_result_name() -> String {
    "ImageVisibilityHandler-test_result".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cfg_automated() -> String {
    "/cfgs/automated".to_string()
}

fn default_cfg_prevailing_visibility() -> String {
    "/cfgs/ImagePrevailingVisibilityCfg.xml".to_string()
}

fn default_analyzer_timeout() -> u64 {
    3600 // 1 hour
}

/// How inputs are fetched from storage.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// One well-known input image per job.
    #[default]
    Single,
    /// Every object in the job's input collection.
    Multi,
}

/// Storage layout and transfer behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferConfig {
    #[serde(default)]
    pub mode: TransferMode,
    /// Collection under which inputs are stored.
    #[serde(default = "default_input_root")]
    pub input_root: String,
    /// Collection under which results are stored.
    #[serde(default = "default_output_root")]
    pub output_root: String,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_transfer_timeout")]
    pub timeout_secs: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            mode: TransferMode::default(),
            input_root: default_input_root(),
            output_root: default_output_root(),
            timeout_secs: default_transfer_timeout(),
        }
    }
}

fn default_input_root() -> String {
    "visibility/input".to_string()
}

fn default_output_root() -> String {
    "visibility/output".to_string()
}

fn default_transfer_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HandlerConfig::default();
        assert!(config.workspace.root.ends_with("visibilityHandler"));
        assert_eq!(config.analyzer.result_name, "ImageVisibilityHandler-test_result");
        assert_eq!(config.analyzer.cfg_automated, "/cfgs/automated");
        assert!(config.analyzer.generate_image);
        assert!(!config.analyzer.report_subprocess_failure);
        assert_eq!(config.analyzer.timeout_secs, 3600);
        assert_eq!(config.transfer.timeout_secs, 60);
    }

    #[test]
    fn test_deserialize_partial_analyzer_section() {
        let toml = r#"
[analyzer]
program = "sh"
leading_args = ["-c", "exit 0", "analyzer"]
report_subprocess_failure = true
"#;
        let config: HandlerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.analyzer.program, "sh");
        assert_eq!(config.analyzer.leading_args.len(), 3);
        assert!(config.analyzer.report_subprocess_failure);
        assert_eq!(config.analyzer.input_prefix, "panasonic_fullhd_01");
    }

    #[test]
    fn test_deserialize_transfer_mode() {
        let toml = r#"
[transfer]
mode = "multi"
output_root = "results"
"#;
        let config: HandlerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.transfer.mode, TransferMode::Multi);
        assert_eq!(config.transfer.output_root, "results");
        assert_eq!(config.transfer.input_root, "visibility/input");
    }
}
