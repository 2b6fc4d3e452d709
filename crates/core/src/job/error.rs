//! Error types for request parsing.

use thiserror::Error;

/// Errors raised while turning a raw request into job parameters.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required field is missing or has the wrong type.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// A datetime component is outside its calendar range.
    #[error("Invalid {field}: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        expected: &'static str,
    },

    /// Only one of `pan` / `azimuth` was given.
    #[error("Malformed request: pan and azimuth must be given together")]
    PartialOrientation,
}
