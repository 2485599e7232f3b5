use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("unknown scenario '{scenario}'")]
    UnknownScenario { scenario: String },
}

/// Why a file replay failed.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The path could not be opened as a regular file. The scenario was not touched.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed part way. The scenario holds everything before `line`.
    #[error("failed to read {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}
