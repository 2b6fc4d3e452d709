use super::{types::HandlerConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Analyzer program and result name are not empty
/// - Storage roots are not empty
/// - Transfer timeout is not 0
pub fn validate_config(config: &HandlerConfig) -> Result<(), ConfigError> {
    if config.analyzer.program.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "analyzer.program cannot be empty".to_string(),
        ));
    }

    if config.analyzer.result_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "analyzer.result_name cannot be empty".to_string(),
        ));
    }

    if config.transfer.input_root.trim_matches('/').is_empty()
        || config.transfer.output_root.trim_matches('/').is_empty()
    {
        return Err(ConfigError::ValidationError(
            "transfer.input_root and transfer.output_root cannot be empty".to_string(),
        ));
    }

    if config.transfer.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "transfer.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
