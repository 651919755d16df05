//! Per-process session state.
//!
//! Holds the gateway, the bound schema, the output format and the debug flag
//! that shell commands (`use`, `set format`, `set debug`) change. Both front
//! ends build their controller from here.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::gateway::QueryGateway;
use crate::logging::LogHandle;
use crate::output::OutputFormat;
use crate::query::{ControllerSettings, ExecutionController};

/// Mutable session state shared by the command handlers.
pub struct Session {
    gateway: Arc<dyn QueryGateway>,
    settings: ControllerSettings,
    schema: Option<String>,
    format: OutputFormat,
    log: Option<LogHandle>,
}

impl Session {
    /// Creates a new session.
    pub fn new(
        gateway: Arc<dyn QueryGateway>,
        settings: ControllerSettings,
        schema: Option<String>,
        format: OutputFormat,
    ) -> Self {
        Self {
            gateway,
            settings,
            schema: normalize_schema(schema.as_deref()),
            format,
            log: None,
        }
    }

    /// Attaches the handle used to switch log verbosity at runtime.
    pub fn with_log_handle(mut self, log: LogHandle) -> Self {
        self.log = Some(log);
        self
    }

    pub fn gateway(&self) -> &dyn QueryGateway {
        self.gateway.as_ref()
    }

    /// A controller bound to this session's gateway and current settings.
    pub fn controller(&self) -> ExecutionController<'_> {
        ExecutionController::new(self.gateway.as_ref(), self.settings.clone())
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Binds the session to `schema`. A trailing `;` is dropped; blank unbinds.
    pub fn set_schema(&mut self, schema: &str) {
        self.schema = normalize_schema(Some(schema));
        info!(schema = ?self.schema, "Changed schema");
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn debug(&self) -> bool {
        self.settings.debug
    }

    /// Turns debug output on or off, including the log filter when attached.
    pub fn set_debug(&mut self, debug: bool) -> Result<()> {
        if let Some(log) = &self.log {
            log.set_debug(debug)?;
        }
        self.settings.debug = debug;
        Ok(())
    }

    /// Shell prompt showing the bound schema.
    pub fn prompt(&self) -> String {
        match &self.schema {
            Some(schema) => format!("athena:{schema}> "),
            None => "athena> ".to_string(),
        }
    }

    /// Current settings as `name value` pairs, for `set` without arguments.
    pub fn describe_settings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("debug", self.debug().to_string()),
            ("format", self.format.to_string()),
            ("schema", self.schema.clone().unwrap_or_default()),
            ("region", self.gateway.region().to_string()),
            (
                "result_location",
                self.settings
                    .result_location
                    .as_ref()
                    .map(|u| u.to_string())
                    .unwrap_or_default(),
            ),
            ("encryption", self.settings.encrypted.to_string()),
        ]
    }
}

fn normalize_schema(schema: Option<&str>) -> Option<String> {
    schema
        .map(|s| s.trim().trim_end_matches(';').trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}
