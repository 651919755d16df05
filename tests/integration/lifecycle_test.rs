//! Query lifecycle integration tests.
//!
//! Tests submission, polling, cancellation and batch runs against the mock
//! gateway.

use super::{mock_session, test_settings};
use athena_cli::batch::run_batch;
use athena_cli::error::AthenaError;
use athena_cli::gateway::{MockGateway, QueryState, QueryStatus, ResultPage};
use athena_cli::interrupt::Interrupts;
use athena_cli::output::{self, OutputFormat};
use athena_cli::query::{ExecutionController, ResultCursor};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

fn single_column_page(name: &str, values: &[&str]) -> ResultPage {
    ResultPage {
        header: Some(vec![name.to_string()]),
        rows: values.iter().map(|v| vec![Some(v.to_string())]).collect(),
        next_token: None,
    }
}

#[tokio::test]
async fn test_end_to_end_select_one() {
    let mock = MockGateway::new()
        .with_states(&[QueryState::Queued, QueryState::Succeeded])
        .with_pages(vec![single_column_page("_col0", &["1"])]);
    let controller = ExecutionController::new(&mock, test_settings());

    let id = controller.submit(Some("sales"), "SELECT 1").await.unwrap();
    let execution = controller
        .await_completion(&id, &CancellationToken::new(), |_| {})
        .await
        .unwrap();
    assert_eq!(execution.state, QueryState::Succeeded);
    assert_eq!(mock.status_calls(), 2);

    let mut cursor = ResultCursor::open(&mock, &id).await.unwrap();
    let header = cursor.header().to_vec();
    let mut sink = Vec::new();
    let rows_written = output::render(&header, cursor.rows(), OutputFormat::CsvHeader, &mut sink)
        .await
        .unwrap();

    let text = String::from_utf8(sink).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["\"_col0\"", "\"1\""]);
    assert_eq!(rows_written, 1);

    let submissions = mock.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].schema, "sales");
    assert_eq!(submissions[0].sql, "SELECT 1");
}

#[tokio::test]
async fn test_cancel_while_running() {
    let cancel = CancellationToken::new();
    let hook_token = cancel.clone();
    let mock = MockGateway::new()
        .with_states(&[QueryState::Running])
        .on_status(move |_| hook_token.cancel());
    let controller = ExecutionController::new(&mock, test_settings());

    let id = controller.submit(Some("sales"), "SELECT 1").await.unwrap();
    let execution = controller.await_completion(&id, &cancel, |_| {}).await.unwrap();

    assert_eq!(execution.state, QueryState::Cancelled);
    assert!(execution.cancelled_by_user);
    assert_eq!(mock.cancel_calls(), 1);
    assert_eq!(mock.status_calls(), 1);
}

#[tokio::test]
async fn test_observer_sees_each_state() {
    let mock = MockGateway::new().with_states(&[
        QueryState::Queued,
        QueryState::Running,
        QueryState::Running,
        QueryState::Succeeded,
    ]);
    let controller = ExecutionController::new(&mock, test_settings());
    let seen = Mutex::new(Vec::new());

    let id = controller.submit(Some("sales"), "SELECT 1").await.unwrap();
    controller
        .await_completion(&id, &CancellationToken::new(), |status| {
            seen.lock().unwrap().push(status.state)
        })
        .await
        .unwrap();

    assert_eq!(
        seen.into_inner().unwrap(),
        vec![
            QueryState::Queued,
            QueryState::Running,
            QueryState::Running,
            QueryState::Succeeded
        ]
    );
}

#[tokio::test]
async fn test_rejected_submission_is_not_polled() {
    let mock = MockGateway::new().rejecting("line 1:1: mismatched input 'SELEC'");
    let controller = ExecutionController::new(&mock, test_settings());

    let err = controller.submit(Some("sales"), "SELEC 1").await.unwrap_err();
    assert!(matches!(err, AthenaError::Rejected(_)));
    assert_eq!(mock.status_calls(), 0);
}

#[tokio::test]
async fn test_missing_schema_never_reaches_gateway() {
    let mock = Arc::new(MockGateway::new());
    let session = mock_session(mock.clone(), None, OutputFormat::Csv);

    let err = session.controller().submit(session.schema(), "SELECT 1").await.unwrap_err();
    assert!(matches!(err, AthenaError::Config(_)));
    assert!(err.to_string().contains("Schema must be specified"));
    assert!(mock.submissions().is_empty());
}

#[tokio::test]
async fn test_failed_query_keeps_reason_and_statistics() {
    let mut failed = QueryStatus::new(QueryState::Failed);
    failed.failure_reason = Some("HIVE_BAD_DATA: malformed row".to_string());
    failed.bytes_scanned = Some(2048);
    let mock =
        MockGateway::new().with_statuses(vec![QueryStatus::new(QueryState::Running), failed]);
    let controller = ExecutionController::new(&mock, test_settings());

    let id = controller.submit(Some("logs"), "SELECT * FROM t").await.unwrap();
    let execution = controller
        .await_completion(&id, &CancellationToken::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(execution.state, QueryState::Failed);
    assert_eq!(
        execution.failure_reason.as_deref(),
        Some("HIVE_BAD_DATA: malformed row")
    );
    assert!(execution.summary().contains("Data Scanned: 2.00KB"));
}

#[tokio::test]
async fn test_status_outage_surfaces_after_retries() {
    let mock = MockGateway::new().with_status_failures(10);
    let controller = ExecutionController::new(&mock, test_settings());

    let id = controller.submit(Some("sales"), "SELECT 1").await.unwrap();
    let err = controller
        .await_completion(&id, &CancellationToken::new(), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, AthenaError::Unavailable(_)));
    assert_eq!(mock.status_calls(), test_settings().max_status_attempts);
}

#[tokio::test]
async fn test_batch_run_with_csv_header() {
    let mock = Arc::new(
        MockGateway::new()
            .with_states(&[QueryState::Queued, QueryState::Succeeded])
            .with_pages(vec![single_column_page("_col0", &["_col0", "1"])]),
    );
    let session = mock_session(mock.clone(), Some("sales"), OutputFormat::CsvHeader);
    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());

    let outcome = run_batch(&session, "SELECT 1", &CancellationToken::new(), &mut out, &mut err)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "\"_col0\"\n\"1\"\n");
    assert!(err.is_empty());
    assert_eq!(outcome.rows_written, 1);
    assert_eq!(outcome.exit_status(), 0);
}

#[tokio::test]
async fn test_interrupt_cancels_only_the_running_statement() {
    let interrupts = Arc::new(Interrupts::detached());
    let trigger = interrupts.clone();
    let mock = Arc::new(
        MockGateway::new()
            .with_states(&[QueryState::Running, QueryState::Succeeded])
            .with_pages(vec![single_column_page("_col0", &["1"])])
            .on_status(move |call| {
                if call == 1 {
                    trigger.trigger();
                }
            }),
    );
    let session = mock_session(mock.clone(), Some("sales"), OutputFormat::Csv);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let first = run_batch(&session, "SELECT 1", &interrupts.arm(), &mut out, &mut err)
        .await
        .unwrap();
    assert_eq!(first.execution.state, QueryState::Cancelled);
    assert_eq!(first.exit_status(), 1);
    assert_eq!(mock.cancel_calls(), 1);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let second = run_batch(&session, "SELECT 1", &interrupts.arm(), &mut out, &mut err)
        .await
        .unwrap();
    assert_eq!(second.execution.state, QueryState::Succeeded);
    assert!(!second.interrupted);
    assert_eq!(String::from_utf8(out).unwrap(), "\"1\"\n");
    assert_eq!(second.exit_status(), 0);
    assert_eq!(mock.cancel_calls(), 1);
}
