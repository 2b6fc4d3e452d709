//! Common test utilities for job-level testing with mocks.
//!
//! The fixture wires a [`JobHandler`] to an in-memory storage backend and
//! a `sh -c` stand-in for the analyzer, so whole jobs run without a WebDAV
//! server or the real analyzer installed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use visibility_core::{
    testing::{MockConnector, MockStorage},
    AnalyzerConfig, HandlerConfig, JobHandler, JobResponse, WorkspaceConfig,
};

/// Storage key of the input image for [`request`].
pub const INPUT_KEY: &str = "visibility/input/2023/05/01/panasonic_fullhd_01-1-1-202351100.jpg";

/// Output collection for [`request`].
pub const OUTPUT_COLLECTION: &str = "visibility/output/2023/05/01/1000-001-001";

/// Result name used by the fixture analyzer.
pub const RESULT_NAME: &str = "ImageVisibilityHandler-test_result";

/// Handler under test plus the mocks behind it.
pub struct TestHarness {
    pub handler: JobHandler,
    pub storage: Arc<MockStorage>,
    pub connector: Arc<MockConnector>,
    dir: TempDir,
}

impl TestHarness {
    /// Harness whose analyzer runs `script` through `sh -c` in the working directory.
    pub fn new(script: &str) -> Self {
        Self::with_config(script, |_| {})
    }

    /// Like [`TestHarness::new`], with a hook to adjust the configuration.
    pub fn with_config(script: &str, adjust: impl FnOnce(&mut HandlerConfig)) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = analyzer_config(dir.path(), script);
        adjust(&mut config);

        let storage = Arc::new(MockStorage::new());
        let connector = Arc::new(MockConnector::new(storage.clone()));
        let handler = JobHandler::with_connector(config, connector.clone());

        Self {
            handler,
            storage,
            connector,
            dir,
        }
    }

    /// Working directory shared by non-isolated runs.
    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub async fn handle(&self, request: Value) -> JobResponse {
        self.handler.handle(request).await
    }
}

/// Configuration rooted in `root` with `sh -c <script>` as the analyzer.
pub fn analyzer_config(root: &Path, script: &str) -> HandlerConfig {
    HandlerConfig {
        workspace: WorkspaceConfig {
            root: root.join("work"),
            capture_dir: root.join("capture"),
            isolate_runs: false,
        },
        analyzer: AnalyzerConfig {
            program: "sh".to_string(),
            leading_args: vec![
                "-c".to_string(),
                script.to_string(),
                "analyzer".to_string(),
            ],
            result_name: RESULT_NAME.to_string(),
            timeout_secs: 30,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Request for 2023-05-01 10:00, pan 1, azimuth 1.
pub fn request(kind: &str) -> Value {
    json!({
        "datetime": {
            "year": 2023, "month": 5, "dom": 1, "hour": 10, "minute": 0,
            "pan": 1, "azimuth": 1
        },
        "storage": {
            "type": kind,
            "url": "https://storage.example/dav/",
            "login": "u",
            "password": "p"
        }
    })
}

/// Position of the first log line ending with `suffix`.
pub fn line_position(response: &JobResponse, suffix: &str) -> Option<usize> {
    response.log.iter().position(|l| l.ends_with(suffix))
}

pub fn has_line(response: &JobResponse, suffix: &str) -> bool {
    line_position(response, suffix).is_some()
}
