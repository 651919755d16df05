//! Remote query gateway abstraction.
//!
//! The console only ever talks to the query service through the
//! [`QueryGateway`] trait: submit, poll status, fetch a result page, cancel.
//! [`AthenaGateway`] is the production backend; [`MockGateway`] is a scripted
//! in-memory backend for tests.

mod athena;
mod mock;
mod types;

pub use athena::AthenaGateway;
pub use mock::MockGateway;
pub use types::{Cell, ExecutionId, QueryState, QueryStatus, ResultPage, SubmitRequest};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface the console requires from the query service.
///
/// All operations are async and return Results with AthenaError.
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Submits a statement and returns the execution id.
    async fn submit_query(&self, request: &SubmitRequest) -> Result<ExecutionId>;

    /// Returns the current status of an execution.
    async fn get_status(&self, id: &ExecutionId) -> Result<QueryStatus>;

    /// Fetches one page of results, starting after `next_token` when given.
    async fn get_result_page(&self, id: &ExecutionId, next_token: Option<&str>)
        -> Result<ResultPage>;

    /// Requests cancellation of an execution.
    async fn cancel_query(&self, id: &ExecutionId) -> Result<()>;

    /// Region the gateway talks to, used for console links.
    fn region(&self) -> &str;
}
