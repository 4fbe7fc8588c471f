//! Lookup error taxonomy.
//!
//! The `Display` of a [`LookupError`] is the message shown to the user. The
//! underlying cause stays reachable through `source()` for logging only.

use reqwest::StatusCode;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "City not found. Please check the city name and try again.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again later.";

/// Why a lookup failed, as seen by callers that only need to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupErrorKind {
    NotFound,
    NetworkOrParseFailure,
}

impl LookupErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupErrorKind::NotFound => NOT_FOUND_MESSAGE,
            LookupErrorKind::NetworkOrParseFailure => FETCH_FAILED_MESSAGE,
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// Provider answered with a non-success status.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound { status: StatusCode, body: String },

    #[error("{}", FETCH_FAILED_MESSAGE)]
    NetworkOrParseFailure(#[from] FetchFailure),
}

impl LookupError {
    pub fn kind(&self) -> LookupErrorKind {
        match self {
            LookupError::NotFound { .. } => LookupErrorKind::NotFound,
            LookupError::NetworkOrParseFailure(_) => LookupErrorKind::NetworkOrParseFailure,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

/// Transport or decoding problem behind a `NetworkOrParseFailure`.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather response is incomplete: {0}")]
    Incomplete(&'static str),
}

/// Stored form of a failed lookup: what the session keeps and the shell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub kind: LookupErrorKind,
    pub message: &'static str,
}

impl From<&LookupError> for LookupFailure {
    fn from(err: &LookupError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}
