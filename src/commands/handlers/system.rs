//! System command handlers (help, quit).

use super::CommandResult;
use crate::commands::help::HELP_TEXT;

/// Handle `help`.
pub fn handle_help() -> CommandResult {
    CommandResult::message(HELP_TEXT)
}

/// Handle `quit`, `exit` or end of input.
pub fn handle_quit() -> CommandResult {
    CommandResult::Exit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_shell_commands() {
        match handle_help() {
            CommandResult::Message(text) => {
                assert!(text.contains("set format"));
                assert!(text.contains("MSCK REPAIR TABLE"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
