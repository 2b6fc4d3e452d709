//! Storage key derivation.

use crate::config::TransferConfig;
use crate::job::JobParams;

/// Maps job parameters to storage keys.
///
/// - input object: `<input_root>/YYYY/MM/DD/<input file>`
/// - input collection: `<input_root>/YYYY/MM/DD/HHMM[-PPP-AAA]`
/// - output collection: `<output_root>/YYYY/MM/DD/HHMM[-PPP-AAA]`
#[derive(Debug, Clone)]
pub struct StorageLayout {
    input_root: String,
    output_root: String,
}

impl StorageLayout {
    pub fn new(config: &TransferConfig) -> Self {
        Self {
            input_root: config.input_root.trim_matches('/').to_string(),
            output_root: config.output_root.trim_matches('/').to_string(),
        }
    }

    /// Key of the single well-known input object.
    pub fn input_key(&self, params: &JobParams, file_name: &str) -> String {
        format!("{}/{}/{}", self.input_root, params.date_path(), file_name)
    }

    /// Collection holding every input object of a job.
    pub fn input_collection(&self, params: &JobParams) -> String {
        format!(
            "{}/{}/{}",
            self.input_root,
            params.date_path(),
            params.slot()
        )
    }

    /// Collection receiving the job's results.
    pub fn output_collection(&self, params: &JobParams) -> String {
        format!(
            "{}/{}/{}",
            self.output_root,
            params.date_path(),
            params.slot()
        )
    }
}
