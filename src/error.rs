//! Error types for the Athena console.
//!
//! Defines the main error enum used throughout the application. Query
//! outcomes (`FAILED`, `CANCELLED`) are not errors; they are reported through
//! [`crate::query::QueryExecution`].

use thiserror::Error;

/// Main error type for console operations.
#[derive(Error, Debug)]
pub enum AthenaError {
    /// Missing or invalid configuration (no schema bound, no result location, bad config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The gateway refused the request (bad SQL, validation failure, throttling on submit).
    #[error("Query rejected: {0}")]
    Rejected(String),

    /// Transport or service failure while polling, fetching or cancelling.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The output consumer (e.g. the pager) closed its end of the pipe early.
    #[error("Output closed by reader after {rows_written} rows")]
    SinkClosed {
        /// Data rows fully written before the pipe closed.
        rows_written: usize,
    },

    /// Genuine I/O failure while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors (malformed gateway responses, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AthenaError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a rejection error with the given message.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Creates an unavailability error with the given message.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Rejected(_) => "Query Rejected",
            Self::Unavailable(_) => "Service Unavailable",
            Self::SinkClosed { .. } => "Output Closed",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using AthenaError.
pub type Result<T> = std::result::Result<T, AthenaError>;
