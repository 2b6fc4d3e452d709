//! The response envelope returned for every request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Which branch of the envelope is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Value,
    Exception,
}

/// Result payload of a successful job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobValue {
    pub result: String,
}

impl JobValue {
    pub fn ok() -> Self {
        Self {
            result: "OK".to_string(),
        }
    }
}

/// Response envelope. Exactly one of `value` / `exception` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    /// The request, echoed verbatim.
    pub request: Value,
    pub result: ResultKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JobValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    pub log: Vec<String>,
}

impl JobResponse {
    pub fn value(request: Value, value: JobValue, log: Vec<String>) -> Self {
        Self {
            request,
            result: ResultKind::Value,
            value: Some(value),
            exception: None,
            log,
        }
    }

    pub fn exception(request: Value, error: &impl Display, log: Vec<String>) -> Self {
        Self {
            request,
            result: ResultKind::Exception,
            value: None,
            exception: Some(error.to_string()),
            log,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == ResultKind::Value
    }
}
