//! Error types for the session core.
//!
//! Every error here is local to one input; none of them end or corrupt
//! the session.

use thiserror::Error;

use crate::types::Lifecycle;

/// Rejection of a single controller input
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("illegal move {from}{to}")]
    IllegalMove { from: String, to: String },

    #[error("recommended move {0:?} could not be applied")]
    UnplayableRecommendation(String),

    #[error("view index {index} out of range for {len} recorded moves")]
    OutOfRangeView { index: usize, len: usize },

    #[error("recommender request failed: {0}")]
    RecommenderTransport(#[from] RecommenderError),

    #[error("stale recommender response discarded")]
    StaleRecommenderResponse,

    #[error("time mode can only be changed before the game starts")]
    InvalidModeChange,

    #[error("input rejected: {0}")]
    InputRejected(&'static str),

    #[error("input rejected while {0:?}")]
    WrongLifecycle(Lifecycle),

    #[error("ledger holds {ledger} moves but the rules engine reports {engine}")]
    LedgerOutOfSync { ledger: usize, engine: usize },
}

/// Failures from the rules engine constructors
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("invalid position notation {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Failures talking to the recommender service
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecommenderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service answered with status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for RecommenderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            RecommenderError::Status(status.as_u16())
        } else if err.is_decode() {
            RecommenderError::MalformedBody(err.to_string())
        } else {
            RecommenderError::Transport(err.to_string())
        }
    }
}

/// Failures loading the session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
