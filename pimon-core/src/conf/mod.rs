mod error;
mod loader;
mod report;
pub mod types;
mod validate;


pub use error::ConfigError;
pub use loader::{load_config, load_or_default, parse_config};
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use types::{
    BroadcastConfig, LiveResumption, MonitorConfig, RetentionConfig, ScenarioConfig,
    SourceConfig, StartPosition,
};
pub use validate::validate_config;
