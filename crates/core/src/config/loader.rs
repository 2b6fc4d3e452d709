use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::HandlerConfig, ConfigError};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "VISIBILITY_";

/// Load configuration from defaults, an optional TOML file and environment overrides.
///
/// Every field has a default, so `None` yields a usable configuration.
/// A path that is given but does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<HandlerConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(HandlerConfig::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<HandlerConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransferMode;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.analyzer.program, "java");
        assert_eq!(config.transfer.mode, TransferMode::Single);
        assert!(!config.workspace.isolate_runs);
    }

    #[test]
    fn test_load_config_from_str_invalid_mode() {
        let toml = r#"
[transfer]
mode = "sideways"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/visibility.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[workspace]
root = "/var/tmp/vis"
isolate_runs = true

[analyzer]
program = "/opt/analyzer/bin/visibility"
timeout_secs = 120

[transfer]
mode = "multi"
"#
        )
        .unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.workspace.root, PathBuf::from("/var/tmp/vis"));
        assert!(config.workspace.isolate_runs);
        assert_eq!(config.analyzer.program, "/opt/analyzer/bin/visibility");
        assert_eq!(config.analyzer.timeout_secs, 120);
        assert_eq!(config.transfer.mode, TransferMode::Multi);
        // Untouched sections keep their defaults
        assert_eq!(config.transfer.input_root, "visibility/input");
    }
}
