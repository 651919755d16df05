//! Session setting handlers (`use`, `set`).

use super::CommandResult;
use crate::output::OutputFormat;
use crate::session::Session;

/// Handle `use <schema>`.
pub fn handle_use(session: &mut Session, schema: &str) -> CommandResult {
    if schema.trim().is_empty() {
        return CommandResult::error("Usage: use <schema>");
    }
    session.set_schema(schema);
    CommandResult::None
}

/// Handle `set` with no arguments.
pub fn handle_show(session: &Session) -> CommandResult {
    let settings = session.describe_settings();
    let width = settings.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let lines: Vec<String> = settings
        .iter()
        .map(|(name, value)| format!("{name:width$}  {value}"))
        .collect();
    CommandResult::Message(lines.join("\n"))
}

/// Handle `set format <FORMAT>`.
pub fn handle_set_format(session: &mut Session, format: OutputFormat) -> CommandResult {
    let previous = session.format();
    session.set_format(format);
    CommandResult::message(format!("format - was: {previous}\nnow: {format}"))
}

/// Handle `set debug <bool>`.
pub fn handle_set_debug(session: &mut Session, debug: bool) -> CommandResult {
    match session.set_debug(debug) {
        Ok(()) => CommandResult::message(format!("debug - now: {debug}")),
        Err(e) => CommandResult::error(e.to_string()),
    }
}
