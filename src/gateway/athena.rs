//! AWS Athena gateway.
//!
//! Wraps the Athena SDK client. Service errors on submit are rejections that
//! the user must fix; every other failure is treated as the service being
//! unavailable.

use super::{Cell, ExecutionId, QueryGateway, QueryState, QueryStatus, ResultPage, SubmitRequest};
use crate::error::{AthenaError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_athena::error::{DisplayErrorContext, SdkError};
use aws_sdk_athena::primitives::DateTime as SdkDateTime;
use aws_sdk_athena::types::{
    EncryptionConfiguration, EncryptionOption, QueryExecutionContext, QueryExecutionState,
    ResultConfiguration,
};
use aws_sdk_athena::Client;
use chrono::{DateTime, Utc};
use tracing::debug;
use url::Url;

/// Rows requested per GetQueryResults call (the service maximum).
const PAGE_SIZE: i32 = 1000;

/// Query gateway backed by AWS Athena.
pub struct AthenaGateway {
    client: Client,
    sdk_config: SdkConfig,
    region: String,
}

impl AthenaGateway {
    /// Loads AWS configuration for the given profile/region and creates a client.
    ///
    /// Falls back to the SDK's default credential and region chain when either
    /// is `None`.
    pub async fn connect(profile: Option<&str>, region: Option<&str>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;

        let region = sdk_config.region().map(|r| r.to_string()).ok_or_else(|| {
            AthenaError::config("No AWS region configured. Use --region or set AWS_DEFAULT_REGION")
        })?;
        debug!(%region, profile = ?profile, "Loaded AWS configuration");

        Ok(Self {
            client: Client::new(&sdk_config),
            sdk_config,
            region,
        })
    }

    /// Derives the default result bucket from the caller's account:
    /// `s3://<profile or aws-athena>-query-results-<account>-<region>`.
    pub async fn default_result_location(&self, profile: Option<&str>) -> Result<Url> {
        let sts = aws_sdk_sts::Client::new(&self.sdk_config);
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| AthenaError::unavailable(DisplayErrorContext(&e).to_string()))?;
        let account = identity
            .account()
            .ok_or_else(|| AthenaError::internal("Caller identity has no account id"))?;

        let location = format!(
            "s3://{}-query-results-{}-{}",
            profile.unwrap_or("aws-athena"),
            account,
            self.region
        );
        Url::parse(&location)
            .map_err(|e| AthenaError::config(format!("Invalid result location {location}: {e}")))
    }
}

#[async_trait]
impl QueryGateway for AthenaGateway {
    async fn submit_query(&self, request: &SubmitRequest) -> Result<ExecutionId> {
        let mut result_configuration =
            ResultConfiguration::builder().output_location(request.result_location.as_str());
        if request.encrypted {
            let encryption = EncryptionConfiguration::builder()
                .encryption_option(EncryptionOption::SseS3)
                .build()
                .map_err(|e| AthenaError::internal(e.to_string()))?;
            result_configuration = result_configuration.encryption_configuration(encryption);
        }

        let output = self
            .client
            .start_query_execution()
            .query_string(&request.sql)
            .client_request_token(&request.idempotency_token)
            .query_execution_context(
                QueryExecutionContext::builder()
                    .database(&request.schema)
                    .build(),
            )
            .result_configuration(result_configuration.build())
            .send()
            .await
            .map_err(submit_error)?;

        output
            .query_execution_id()
            .map(ExecutionId::from)
            .ok_or_else(|| AthenaError::internal("StartQueryExecution returned no execution id"))
    }

    async fn get_status(&self, id: &ExecutionId) -> Result<QueryStatus> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(id.as_str())
            .send()
            .await
            .map_err(remote_error)?;

        let execution = output
            .query_execution()
            .ok_or_else(|| AthenaError::internal(format!("No execution details for {id}")))?;
        let status = execution
            .status()
            .ok_or_else(|| AthenaError::internal(format!("No status for {id}")))?;
        let state = match status.state() {
            Some(state) => map_state(state)?,
            None => return Err(AthenaError::internal(format!("No state for {id}"))),
        };
        let statistics = execution.statistics();

        Ok(QueryStatus {
            state,
            submitted_at: status.submission_date_time().and_then(to_utc),
            completed_at: status.completion_date_time().and_then(to_utc),
            engine_time_millis: statistics.and_then(|s| s.engine_execution_time_in_millis()),
            bytes_scanned: statistics.and_then(|s| s.data_scanned_in_bytes()),
            failure_reason: failure_reason(state, status.state_change_reason()),
        })
    }

    async fn get_result_page(
        &self,
        id: &ExecutionId,
        next_token: Option<&str>,
    ) -> Result<ResultPage> {
        let output = self
            .client
            .get_query_results()
            .query_execution_id(id.as_str())
            .set_next_token(next_token.map(str::to_string))
            .max_results(PAGE_SIZE)
            .send()
            .await
            .map_err(remote_error)?;

        let Some(result_set) = output.result_set() else {
            return Ok(ResultPage {
                next_token: output.next_token().map(str::to_string),
                ..Default::default()
            });
        };

        let header = result_set.result_set_metadata().map(|metadata| {
            metadata
                .column_info()
                .iter()
                .map(|column| column.name().to_string())
                .collect()
        });
        let rows = result_set
            .rows()
            .iter()
            .map(|row| {
                row.data()
                    .iter()
                    .map(|datum| datum.var_char_value().map(str::to_string))
                    .collect::<Vec<Cell>>()
            })
            .collect();

        Ok(ResultPage {
            header,
            rows,
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn cancel_query(&self, id: &ExecutionId) -> Result<()> {
        self.client
            .stop_query_execution()
            .query_execution_id(id.as_str())
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    fn region(&self) -> &str {
        &self.region
    }
}

fn map_state(state: &QueryExecutionState) -> Result<QueryState> {
    match state {
        QueryExecutionState::Queued => Ok(QueryState::Queued),
        QueryExecutionState::Running => Ok(QueryState::Running),
        QueryExecutionState::Succeeded => Ok(QueryState::Succeeded),
        QueryExecutionState::Failed => Ok(QueryState::Failed),
        QueryExecutionState::Cancelled => Ok(QueryState::Cancelled),
        other => Err(AthenaError::internal(format!(
            "Unrecognised query state: {}",
            other.as_str()
        ))),
    }
}

/// The service also sets a state change reason on cancelled and succeeded
/// queries; only a failure carries one here.
fn failure_reason(state: QueryState, reason: Option<&str>) -> Option<String> {
    match state {
        QueryState::Failed => reason.map(str::to_string),
        _ => None,
    }
}

fn to_utc(value: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

/// Maps a submit failure: service errors are rejections, the rest is transport.
fn submit_error<E, R>(err: SdkError<E, R>) -> AthenaError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(_) => AthenaError::rejected(message),
        _ => AthenaError::unavailable(message),
    }
}

fn remote_error<E, R>(err: SdkError<E, R>) -> AthenaError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    AthenaError::unavailable(DisplayErrorContext(&err).to_string())
}
