//! Wire types exchanged with the query gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Opaque handle for one submitted query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(String);

impl ExecutionId {
    /// Wraps a gateway-issued execution id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExecutionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle state of a query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl QueryState {
    /// Returns true for states from which no further transition occurs.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Returns the state name as the gateway spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Snapshot returned by a status check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStatus {
    pub state: QueryState,
    pub submitted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Engine execution time, only meaningful once terminal.
    pub engine_time_millis: Option<i64>,
    /// Bytes scanned, only meaningful once terminal.
    pub bytes_scanned: Option<i64>,
    /// Reason reported by the gateway for a failed query.
    pub failure_reason: Option<String>,
}

impl QueryStatus {
    /// Creates a status with only the state populated.
    pub fn new(state: QueryState) -> Self {
        Self {
            state,
            submitted_at: None,
            completed_at: None,
            engine_time_millis: None,
            bytes_scanned: None,
            failure_reason: None,
        }
    }
}

/// A single result cell; `None` means the gateway sent no value.
pub type Cell = Option<String>;

/// One page of a paginated result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    /// Column names. Only the first page's header is used.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
    /// Token for the next page; `None` on the last page.
    pub next_token: Option<String>,
}

/// Parameters for a submit call.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub schema: String,
    pub sql: String,
    /// Client-generated token; the gateway deduplicates retries on it.
    pub idempotency_token: String,
    pub result_location: Url,
    pub encrypted: bool,
}
