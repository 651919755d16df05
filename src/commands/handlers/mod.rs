//! Command handlers for the Athena shell.
//!
//! Each handler takes the session and returns a result for the shell to act
//! on. Statements are not executed here; they come back as
//! [`CommandResult::Execute`] because running them needs the shell's
//! terminal and pager.

pub mod settings;
pub mod system;

use super::router::{Command, SetCommand};
use crate::session::Session;

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Text to print on stdout.
    Message(String),
    /// Text to print on stderr.
    Error(String),
    /// Submit this statement.
    Execute(String),
    /// The shell should exit.
    Exit,
    /// No action needed.
    None,
}

impl CommandResult {
    /// Creates a message result.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    /// Creates an error result.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }
}

/// Routes a parsed command to its handler.
pub fn dispatch(session: &mut Session, command: Command) -> CommandResult {
    match command {
        Command::Statement(sql) => CommandResult::Execute(sql),
        Command::Use(schema) => settings::handle_use(session, &schema),
        Command::Set(SetCommand::Show) => settings::handle_show(session),
        Command::Set(SetCommand::Format(format)) => settings::handle_set_format(session, format),
        Command::Set(SetCommand::Debug(debug)) => settings::handle_set_debug(session, debug),
        Command::Set(SetCommand::Invalid(msg)) => CommandResult::Error(msg),
        Command::Help => system::handle_help(),
        Command::Quit => system::handle_quit(),
        Command::Empty => CommandResult::None,
    }
}
