//! Job request, parameters, execution log and response envelope.
//!
//! A request arrives as an untyped JSON object. It is echoed verbatim in the
//! response, so parsing never consumes it: [`JobRequest::from_value`] reads a
//! typed view and leaves the original untouched.

mod error;
mod log;
mod naming;
mod response;
mod types;

pub use error::RequestError;
pub use log::{ExecutionLog, LogEntry, LogLevel};
pub use naming::ArtifactNaming;
pub use response::{JobResponse, JobValue, ResultKind};
pub use types::{JobParams, JobRequest, Orientation};
