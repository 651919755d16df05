//! Query lifecycle control.
//!
//! Submits statements, drives the polling state machine until the execution
//! reaches a terminal state (or the caller cancels it), and turns the final
//! status into a [`QueryExecution`] with presentation statistics.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::stats::{self, DEFAULT_SIZE_PRECISION};
use crate::error::{AthenaError, Result};
use crate::gateway::{ExecutionId, QueryGateway, QueryState, QueryStatus, SubmitRequest};

/// Interval between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Attempts per status check before an unavailable gateway is reported.
pub const MAX_STATUS_ATTEMPTS: usize = 3;

/// Settings threaded into the controller by the front end.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Where the service writes result files. Required for submission.
    pub result_location: Option<Url>,
    /// Request SSE-S3 encryption of the result files.
    pub encrypted: bool,
    pub poll_interval: Duration,
    pub max_status_attempts: usize,
    /// Log every polled status at info level.
    pub debug: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            result_location: None,
            encrypted: false,
            poll_interval: POLL_INTERVAL,
            max_status_attempts: MAX_STATUS_ATTEMPTS,
            debug: false,
        }
    }
}

/// A query execution that reached a terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct QueryExecution {
    pub id: ExecutionId,
    pub state: QueryState,
    pub submitted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub engine_time_millis: Option<i64>,
    pub bytes_scanned: Option<i64>,
    pub failure_reason: Option<String>,
    /// True when the loop stopped because the caller cancelled it.
    pub cancelled_by_user: bool,
}

impl QueryExecution {
    fn from_status(id: ExecutionId, status: QueryStatus) -> Self {
        Self {
            id,
            state: status.state,
            submitted_at: status.submitted_at,
            completed_at: status.completed_at,
            engine_time_millis: status.engine_time_millis,
            bytes_scanned: status.bytes_scanned,
            failure_reason: status.failure_reason,
            cancelled_by_user: false,
        }
    }

    fn cancelled(id: ExecutionId, last: Option<QueryStatus>) -> Self {
        let mut execution = match last {
            Some(status) => Self::from_status(id, status),
            None => Self::from_status(id, QueryStatus::new(QueryState::Cancelled)),
        };
        execution.state = QueryState::Cancelled;
        execution.cancelled_by_user = true;
        execution
    }

    pub fn succeeded(&self) -> bool {
        self.state == QueryState::Succeeded
    }

    /// Wall-clock time between submission and completion, when both are known.
    pub fn elapsed(&self) -> Option<TimeDelta> {
        Some(self.completed_at? - self.submitted_at?)
    }

    /// Estimated cost of the bytes scanned.
    pub fn cost(&self) -> f64 {
        stats::compute_cost(self.bytes_scanned_u64())
    }

    fn bytes_scanned_u64(&self) -> u64 {
        self.bytes_scanned
            .and_then(|b| u64::try_from(b).ok())
            .unwrap_or(0)
    }

    /// One-line statistics summary for display.
    pub fn summary(&self) -> String {
        let elapsed = self
            .elapsed()
            .map(stats::format_elapsed)
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Time: {}, CPU Time: {}ms total, Data Scanned: {}, Cost: {}",
            elapsed,
            self.engine_time_millis.unwrap_or(0),
            stats::human_readable_size(self.bytes_scanned_u64(), DEFAULT_SIZE_PRECISION),
            stats::format_cost(self.cost())
        )
    }
}

/// Drives query executions against a gateway.
///
/// Assumes single-flight use: the front end starts a new submission only after
/// the previous one finished or was cancelled.
pub struct ExecutionController<'a> {
    gateway: &'a dyn QueryGateway,
    settings: ControllerSettings,
}

impl<'a> ExecutionController<'a> {
    /// Creates a new controller.
    pub fn new(gateway: &'a dyn QueryGateway, settings: ControllerSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Submits a statement against `schema`.
    ///
    /// Fails without contacting the gateway when no schema or result location
    /// is configured. Every call carries a fresh idempotency token.
    pub async fn submit(&self, schema: Option<&str>, sql: &str) -> Result<ExecutionId> {
        let schema = schema.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
            AthenaError::config("Schema must be specified when session schema is not set")
        })?;
        let result_location = self.settings.result_location.clone().ok_or_else(|| {
            AthenaError::config(
                "No result location configured. Use --s3-bucket or set result_location",
            )
        })?;

        let request = SubmitRequest {
            schema: schema.to_string(),
            sql: sql.to_string(),
            idempotency_token: Uuid::new_v4().to_string(),
            result_location,
            encrypted: self.settings.encrypted,
        };

        let id = self.gateway.submit_query(&request).await?;
        info!(execution_id = %id, schema, "Submitted query");
        Ok(id)
    }

    /// Polls until the execution reaches a terminal state.
    ///
    /// `observer` sees every polled status before the loop sleeps. When
    /// `cancel` fires, the loop issues one cancel call and returns a
    /// `CANCELLED` execution without waiting for another status check.
    pub async fn await_completion<F>(
        &self,
        id: &ExecutionId,
        cancel: &CancellationToken,
        mut observer: F,
    ) -> Result<QueryExecution>
    where
        F: FnMut(&QueryStatus),
    {
        let mut last = None;
        loop {
            if cancel.is_cancelled() {
                return Ok(self.cancel_and_finish(id, last).await);
            }

            let Some(status) = self.poll_status(id, cancel).await? else {
                return Ok(self.cancel_and_finish(id, last).await);
            };
            if self.settings.debug {
                info!(execution_id = %id, state = %status.state, "Polled status");
            } else {
                debug!(execution_id = %id, state = %status.state, "Polled status");
            }
            observer(&status);

            if status.state.is_terminal() {
                return Ok(QueryExecution::from_status(id.clone(), status));
            }
            last = Some(status);

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    return Ok(self.cancel_and_finish(id, last).await);
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }
    }

    /// Requests cancellation. Best-effort: failures are logged, never raised.
    pub async fn cancel(&self, id: &ExecutionId) {
        match self.gateway.cancel_query(id).await {
            Ok(()) => info!(execution_id = %id, "Cancelled query"),
            Err(e) => warn!(execution_id = %id, error = %e, "Cancel request failed"),
        }
    }

    async fn cancel_and_finish(
        &self,
        id: &ExecutionId,
        last: Option<QueryStatus>,
    ) -> QueryExecution {
        self.cancel(id).await;
        QueryExecution::cancelled(id.clone(), last)
    }

    /// One status check, retrying transient failures a bounded number of times.
    ///
    /// Returns `None` when `cancel` fires while waiting to retry.
    async fn poll_status(
        &self,
        id: &ExecutionId,
        cancel: &CancellationToken,
    ) -> Result<Option<QueryStatus>> {
        let attempts = self.settings.max_status_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.gateway.get_status(id).await {
                Ok(status) => return Ok(Some(status)),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(execution_id = %id, attempt, error = %e, "Status check failed, retrying");
                    attempt += 1;
                    tokio::select! {
                        biased;

                        _ = cancel.cancelled() => return Ok(None),
                        _ = tokio::time::sleep(self.settings.poll_interval) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
