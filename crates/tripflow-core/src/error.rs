use std::path::PathBuf;

use thiserror::Error;

/// Core error type for Tripflow.
///
/// Every variant except `Other` is a fatal configuration failure: it aborts
/// the run before any job executes and no report file is produced.
#[derive(Debug, Error)]
pub enum TripflowError {
    #[error("configuration error: {0}")]
    InvalidConfiguration(String),
    #[error("missing environment variable: {0}")]
    MissingSecret(String),
    #[error("I/O error while reading {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown team '{0}' in workflow configuration")]
    UnknownTeam(String),
    #[error("unknown brief '{0}' in workflow configuration")]
    UnknownBrief(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TripflowError {
    pub fn config_io(path: PathBuf, source: std::io::Error) -> Self {
        Self::ConfigIo { path, source }
    }
}

/// Failure of a single job's agent invocation.
///
/// Recovered locally by the workflow runner: the job's slot in the results
/// table receives a `Failed` outcome and execution continues with the next
/// step.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("agent '{0}' is not present in the loaded configuration")]
    MissingAgent(String),
    #[error("provider failure: {0}")]
    Provider(String),
    #[error("malformed agent output: {0}")]
    MalformedOutput(String),
}
