//! Mock query gateway for testing.
//!
//! Replays a scripted sequence of states and result pages, and records every
//! call so tests can assert on how the controller drove the gateway.

use super::{ExecutionId, QueryGateway, QueryState, QueryStatus, ResultPage, SubmitRequest};
use crate::error::{AthenaError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type StatusHook = Box<dyn Fn(usize) + Send + Sync>;

/// A gateway that returns predefined states and pages.
pub struct MockGateway {
    region: String,
    statuses: Mutex<VecDeque<QueryStatus>>,
    final_status: Mutex<QueryStatus>,
    pages: Vec<ResultPage>,
    reject_submit: Option<String>,
    cancel_failure: Option<String>,
    status_failures: AtomicUsize,
    on_status: Option<StatusHook>,
    submissions: Mutex<Vec<SubmitRequest>>,
    status_calls: AtomicUsize,
    page_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
}

impl MockGateway {
    /// Creates a mock whose queries succeed immediately with no results.
    pub fn new() -> Self {
        Self {
            region: "us-east-1".to_string(),
            statuses: Mutex::new(VecDeque::new()),
            final_status: Mutex::new(QueryStatus::new(QueryState::Succeeded)),
            pages: vec![ResultPage::default()],
            reject_submit: None,
            cancel_failure: None,
            status_failures: AtomicUsize::new(0),
            on_status: None,
            submissions: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            page_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
        }
    }

    /// Scripts the states returned by successive status checks.
    ///
    /// The last state is repeated once the script runs out.
    pub fn with_states(self, states: &[QueryState]) -> Self {
        let statuses = states.iter().copied().map(QueryStatus::new).collect();
        self.with_statuses(statuses)
    }

    /// Scripts full status snapshots returned by successive status checks.
    pub fn with_statuses(mut self, statuses: Vec<QueryStatus>) -> Self {
        let mut statuses: VecDeque<QueryStatus> = statuses.into();
        if let Some(last) = statuses.back() {
            self.final_status = Mutex::new(last.clone());
        }
        statuses.pop_back();
        self.statuses = Mutex::new(statuses);
        self
    }

    /// Sets the result pages, chained by the mock in order.
    pub fn with_pages(mut self, pages: Vec<ResultPage>) -> Self {
        let count = pages.len();
        self.pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.next_token = (i + 1 < count).then(|| format!("page-{}", i + 1));
                page
            })
            .collect();
        self
    }

    /// Makes every submit fail with a rejection.
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.reject_submit = Some(message.into());
        self
    }

    /// Makes every cancel request fail, as the service does for a query
    /// that already finished.
    pub fn with_cancel_failure(mut self, message: impl Into<String>) -> Self {
        self.cancel_failure = Some(message.into());
        self
    }

    /// Makes the next `count` status checks fail as unavailable.
    pub fn with_status_failures(self, count: usize) -> Self {
        self.status_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Runs `hook` with the 1-based call number on every status check.
    pub fn on_status(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_status = Some(Box::new(hook));
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Submit requests received so far.
    pub fn submissions(&self) -> Vec<SubmitRequest> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    fn lock_error() -> AthenaError {
        AthenaError::internal("mock gateway state poisoned")
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryGateway for MockGateway {
    async fn submit_query(&self, request: &SubmitRequest) -> Result<ExecutionId> {
        if let Some(message) = &self.reject_submit {
            return Err(AthenaError::rejected(message.clone()));
        }
        let mut submissions = self.submissions.lock().map_err(|_| Self::lock_error())?;
        submissions.push(request.clone());
        Ok(ExecutionId::new(format!("mock-{}", submissions.len())))
    }

    async fn get_status(&self, _id: &ExecutionId) -> Result<QueryStatus> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(hook) = &self.on_status {
            hook(call);
        }

        let failed = self
            .status_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(AthenaError::unavailable("mock status check failed"));
        }

        let next = self
            .statuses
            .lock()
            .map_err(|_| Self::lock_error())?
            .pop_front();
        match next {
            Some(status) => Ok(status),
            None => Ok(self
                .final_status
                .lock()
                .map_err(|_| Self::lock_error())?
                .clone()),
        }
    }

    async fn get_result_page(
        &self,
        _id: &ExecutionId,
        next_token: Option<&str>,
    ) -> Result<ResultPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let index = match next_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| AthenaError::unavailable(format!("invalid token {token}")))?,
        };
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| AthenaError::unavailable(format!("no page {index}")))
    }

    async fn cancel_query(&self, _id: &ExecutionId) -> Result<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        match &self.cancel_failure {
            Some(message) => Err(AthenaError::rejected(message.clone())),
            None => Ok(()),
        }
    }

    fn region(&self) -> &str {
        &self.region
    }
}
