//! Integration tests for the Athena console.

pub mod athena_test;
pub mod lifecycle_test;
pub mod streaming_test;

use athena_cli::gateway::MockGateway;
use athena_cli::output::OutputFormat;
use athena_cli::query::ControllerSettings;
use athena_cli::session::Session;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Settings with a result location and a fast poll interval.
pub fn test_settings() -> ControllerSettings {
    ControllerSettings {
        result_location: Some(Url::parse("s3://athena-test-results/queries/").unwrap()),
        poll_interval: Duration::from_millis(5),
        ..Default::default()
    }
}

/// A session bound to `schema` on top of `mock`.
pub fn mock_session(mock: Arc<MockGateway>, schema: Option<&str>, format: OutputFormat) -> Session {
    Session::new(mock, test_settings(), schema.map(String::from), format)
}
