//! Live Athena integration tests.
//!
//! These tests need AWS credentials and a writable result location. Set
//! ATHENA_TEST_RESULT_LOCATION (e.g. `s3://bucket/prefix/`) to run them;
//! ATHENA_TEST_SCHEMA defaults to `default`.

use athena_cli::config::parse_result_location;
use athena_cli::gateway::{AthenaGateway, QueryState};
use athena_cli::output::{self, OutputFormat};
use athena_cli::query::{ControllerSettings, ExecutionController, ResultCursor};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

/// Helper to create a gateway and settings from the environment.
async fn get_test_gateway() -> Option<(AthenaGateway, ControllerSettings)> {
    let location = std::env::var("ATHENA_TEST_RESULT_LOCATION").ok()?;
    let result_location = parse_result_location(&location).ok()?;
    let gateway = AthenaGateway::connect(None, None).await.ok()?;
    let settings = ControllerSettings {
        result_location: Some(result_location),
        ..Default::default()
    };
    Some((gateway, settings))
}

fn test_schema() -> String {
    std::env::var("ATHENA_TEST_SCHEMA").unwrap_or_else(|_| "default".to_string())
}

#[tokio::test]
async fn test_live_select_one() {
    let Some((gateway, settings)) = get_test_gateway().await else {
        eprintln!("Skipping test: ATHENA_TEST_RESULT_LOCATION not set");
        return;
    };
    let controller = ExecutionController::new(&gateway, settings);

    let id = controller
        .submit(Some(&test_schema()), "SELECT 1")
        .await
        .unwrap();
    let execution = controller
        .await_completion(&id, &CancellationToken::new(), |_| {})
        .await
        .unwrap();
    assert_eq!(execution.state, QueryState::Succeeded);
    assert!(execution.submitted_at.is_some());

    let mut cursor = ResultCursor::open(&gateway, &id).await.unwrap();
    let header = cursor.header().to_vec();
    let mut sink = Vec::new();
    let rows = output::render(&header, cursor.rows(), OutputFormat::CsvHeader, &mut sink)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(sink).unwrap(), "\"_col0\"\n\"1\"\n");
    assert_eq!(rows, 1);
    assert!(cursor.header_row_skipped());
}

#[tokio::test]
async fn test_live_invalid_sql_fails_or_is_rejected() {
    let Some((gateway, settings)) = get_test_gateway().await else {
        eprintln!("Skipping test: ATHENA_TEST_RESULT_LOCATION not set");
        return;
    };
    let controller = ExecutionController::new(&gateway, settings);

    match controller.submit(Some(&test_schema()), "SELEC 1").await {
        Err(e) => assert_eq!(e.category(), "Query Rejected"),
        Ok(id) => {
            let execution = controller
                .await_completion(&id, &CancellationToken::new(), |_| {})
                .await
                .unwrap();
            assert_eq!(execution.state, QueryState::Failed);
            assert!(execution.failure_reason.is_some());
        }
    }
}
