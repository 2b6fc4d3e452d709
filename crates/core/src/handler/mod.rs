//! Job orchestration.
//!
//! [`JobHandler`] is the top-level entry point: it turns a raw request into
//! a [`VisibilityJob`], runs download, analysis and upload in sequence, and
//! always answers with a [`JobResponse`](crate::job::JobResponse), whatever
//! went wrong along the way.

mod error;
mod orchestrator;
mod visibility_job;

pub use error::JobError;
pub use orchestrator::JobHandler;
pub use visibility_job::VisibilityJob;
