use thiserror::Error;

use super::config::ConfigError;
use crate::core::utils::indices::InvalidIndexError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error(transparent)]
    InvalidIndex(#[from] InvalidIndexError),

    #[error(
        "Atoms specified as core atoms are absent from every match of substructure '{query}'; absent atoms: {unmatched:?}"
    )]
    SubstructureMismatch { query: String, unmatched: Vec<usize> },

    #[error("Core distance estimation failed: {0}")]
    Estimator(String),

    #[error("Substructure matching failed: {0}")]
    Matcher(String),

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
