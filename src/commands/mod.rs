//! Command parsing and dispatch for the Athena shell.
//!
//! Parsing is kept apart from execution so commands can be unit tested
//! without a gateway or a terminal.

pub mod handlers;
pub mod help;
pub mod router;

pub use handlers::{dispatch, CommandResult};
pub use router::{Command, CommandRouter, SetCommand, StatementBuffer};
