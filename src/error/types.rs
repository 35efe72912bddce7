// src/error/types.rs
use crate::domain::matching::{MatchConfidence, MatchType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TracebackError {
    /// Required platform metadata is absent. Fatal, never recovered by a fallback.
    #[error("{message}")]
    MissingConfiguration { key: &'static str, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Response had match type {received} which is not enough to proceed (expected {expected})")]
    BelowConfidenceThreshold {
        received: MatchConfidence,
        expected: MatchType,
    },

    #[error("No valid deep link found to resolve")]
    NoResolvableLink,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl TracebackError {
    /// Only missing configuration escapes the fallback chain.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TracebackError::MissingConfiguration { .. })
    }

    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

impl From<r2d2::Error> for TracebackError {
    fn from(err: r2d2::Error) -> Self {
        TracebackError::Pool(err.to_string())
    }
}

impl From<reqwest::Error> for TracebackError {
    fn from(err: reqwest::Error) -> Self {
        TracebackError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for TracebackError {
    fn from(err: url::ParseError) -> Self {
        TracebackError::Protocol(format!("Invalid link: {}", err))
    }
}

pub type TracebackResult<T> = Result<T, TracebackError>;
