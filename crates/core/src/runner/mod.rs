//! Runner for the external visibility analyzer.
//!
//! The analyzer is a black-box executable: it takes file-path arguments,
//! writes its results into the output directory and exposes no exit
//! protocol. The runner launches it with stdout/stderr redirected to
//! capture files, waits for it, and writes everything needed for a
//! post-mortem into the execution log: the argument vector, the working
//! directory listing before and after the run, and both captured streams.

mod analyzer;
mod error;

pub use analyzer::AnalyzerRunner;
pub use error::RunnerError;
