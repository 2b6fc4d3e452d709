//! File naming conventions shared by the transfer and runner stages.

use crate::config::AnalyzerConfig;

use super::types::JobParams;

/// Derives artifact filenames from job parameters.
#[derive(Debug, Clone)]
pub struct ArtifactNaming {
    input_prefix: String,
    input_extension: String,
    pad_timestamp: bool,
    result_name: String,
}

impl ArtifactNaming {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            input_prefix: config.input_prefix.clone(),
            input_extension: config.input_extension.clone(),
            pad_timestamp: config.pad_input_timestamp,
            result_name: config.result_name.clone(),
        }
    }

    /// Name of the input image, e.g. `panasonic_fullhd_01-1-1-202351100.jpg`.
    ///
    /// Unless padding is enabled the date/time fields are concatenated as
    /// plain decimals, so `2023-05-01 10:00` becomes `202351100`.
    pub fn input_file_name(&self, params: &JobParams) -> String {
        let stamp = if self.pad_timestamp {
            format!(
                "{:04}{:02}{:02}{:02}{:02}",
                params.year, params.month, params.dom, params.hour, params.minute
            )
        } else {
            format!(
                "{}{}{}{}{}",
                params.year, params.month, params.dom, params.hour, params.minute
            )
        };

        match params.orientation {
            Some(o) => format!(
                "{}-{}-{}-{}.{}",
                self.input_prefix, o.pan, o.azimuth, stamp, self.input_extension
            ),
            None => format!("{}-{}.{}", self.input_prefix, stamp, self.input_extension),
        }
    }

    /// Output name stem handed to the analyzer.
    pub fn result_name(&self) -> &str {
        &self.result_name
    }

    /// Whether a file in the working directory is an analyzer result.
    pub fn is_result(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.result_name)
    }
}
