//! Error types for the Tycoon API client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Retry budget exhausted after rotating through the server pool")]
    MaxRetriesExceeded {
        #[source]
        source: reqwest::Error,
    },

    // Permanent API failures, never retried
    #[error("Out of API charges")]
    NoCharges,

    #[error("A key is required for this endpoint")]
    KeyRequired,

    #[error("Invalid key given")]
    InvalidKey,

    #[error("Invalid API route: {path}")]
    InvalidRoute { path: String },

    // Configuration errors, raised before any request is dispatched
    #[error("Invalid server index {index}, pool has {len} servers")]
    InvalidServerIndex { index: usize, len: usize },

    #[error("Invalid stat name: {stat}")]
    InvalidStatName { stat: String },

    #[error("Server pool is empty")]
    EmptyServerPool,

    // Data format errors
    #[error("Invalid economy record at line {line}: {reason}")]
    InvalidEconomyRecord { line: usize, reason: String },
}

// Helper methods for common error construction
impl Error {
    /// Create an invalid route error carrying the requested path
    pub fn invalid_route(path: impl Into<String>) -> Self {
        Self::InvalidRoute { path: path.into() }
    }

    /// Create an invalid server index error
    pub fn invalid_server_index(index: usize, len: usize) -> Self {
        Self::InvalidServerIndex { index, len }
    }

    /// Create an invalid stat name error
    pub fn invalid_stat_name(stat: impl Into<String>) -> Self {
        Self::InvalidStatName { stat: stat.into() }
    }

    /// Create an invalid economy record error with line number and reason
    pub fn invalid_economy_record(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidEconomyRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Stable wire code for the fatal API failure classes.
    ///
    /// Returns `None` for configuration, parse, and passthrough transport
    /// errors, which have no wire representation.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::NoCharges => Some("no_charges"),
            Self::KeyRequired => Some("key_protected"),
            Self::InvalidKey => Some("invalid_key"),
            Self::InvalidRoute { .. } => Some("invalid_api"),
            Self::MaxRetriesExceeded { .. } => Some("max_retries"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
