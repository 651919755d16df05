//! Batch mode: run one statement, write its results, report the outcome.

use std::io::Write;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::QueryState;
use crate::output;
use crate::query::{QueryExecution, ResultCursor};
use crate::session::Session;

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub execution: QueryExecution,
    /// Data rows written to the sink; zero unless the query succeeded.
    pub rows_written: usize,
    /// Output stopped early because `cancel` fired while rows were streaming.
    pub interrupted: bool,
}

impl BatchOutcome {
    /// Process exit status: 0 only for a successful query whose results were
    /// written in full.
    pub fn exit_status(&self) -> u8 {
        if self.execution.succeeded() && !self.interrupted {
            0
        } else {
            1
        }
    }
}

/// Submits `sql`, waits silently and renders the results to `out`.
///
/// A failed query writes its reason to `err`. Cancelling `cancel` while the
/// query runs stops it and yields a `CANCELLED` outcome; cancelling it while
/// rows stream stops the output and marks the outcome interrupted.
pub async fn run_batch<W, E>(
    session: &Session,
    sql: &str,
    cancel: &CancellationToken,
    out: &mut W,
    err: &mut E,
) -> Result<BatchOutcome>
where
    W: Write,
    E: Write,
{
    let controller = session.controller();
    let id = controller.submit(session.schema(), sql).await?;
    let execution = controller.await_completion(&id, cancel, |_| {}).await?;

    let mut rows_written = 0;
    let mut interrupted = false;
    match execution.state {
        QueryState::Succeeded => {
            let mut cursor = ResultCursor::open(session.gateway(), &id).await?;
            let header = cursor.header().to_vec();
            let rows = cursor.rows().take_until(cancel.cancelled());
            rows_written = output::render(&header, rows, session.format(), out).await?;
            interrupted = cancel.is_cancelled();
            if interrupted {
                warn!(execution_id = %id, rows_written, "Output interrupted");
            }
        }
        QueryState::Failed => {
            let reason = execution.failure_reason.as_deref().unwrap_or_default();
            writeln!(err, "{reason}")?;
        }
        _ => {}
    }

    info!(
        execution_id = %execution.id,
        state = %execution.state,
        rows_written,
        interrupted,
        "Batch statement finished"
    );
    Ok(BatchOutcome {
        execution,
        rows_written,
        interrupted,
    })
}
