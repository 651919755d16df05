//! Query execution for the Athena console.
//!
//! This module holds the execution lifecycle (submit, poll, cancel), the
//! paginated result reader and the presentation statistics.

pub mod controller;
pub mod reader;
pub mod stats;

pub use controller::{ControllerSettings, ExecutionController, QueryExecution, POLL_INTERVAL};
pub use reader::{ResultCursor, Row, NULL_TEXT};
