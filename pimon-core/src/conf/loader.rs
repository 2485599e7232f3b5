use crate::conf::{ConfigError, MonitorConfig, validate_config};
use std::fs;
use std::path::Path;

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let source = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(path, &source)?;

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all errors)
    //--------------------------------------------------------------------------
    let report = validate_config(&config);
    if !report.errors.is_empty() {
        return Err(ConfigError::Validation { report });
    }

    for warning in &report.warnings {
        tracing::warn!(field = %warning.field, "{}", warning.message);
    }

    Ok(config)
}

/// Parse config text without validating it. `path` is only used in errors.
pub fn parse_config(path: &Path, source: &str) -> Result<MonitorConfig, ConfigError> {
    hcl::from_str(source).map_err(|e| ConfigError::parse(path, e))
}

/// Load `path` when given, otherwise fall back to the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(MonitorConfig::default()),
    }
}
