//! Command parsing and routing for the Athena shell.
//!
//! Parses user input into structured commands that can be dispatched to
//! handlers. Anything that is not a shell command is a SQL statement.

use crate::output::OutputFormat;

/// Leading keywords of statements that may span several lines.
///
/// Input starting with one of these keeps accumulating until a line ends in
/// `;`.
pub const MULTILINE_KEYWORDS: [&str; 10] = [
    "WITH", "SELECT", "ALTER", "CREATE", "DESCRIBE", "DROP", "MSCK", "SHOW", "USE", "VALUES",
];

/// Arguments for the `set` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCommand {
    /// Show all settings.
    Show,
    /// Change the output format.
    Format(OutputFormat),
    /// Turn debug output on or off.
    Debug(bool),
    /// Unparseable `set` arguments, with the message to show.
    Invalid(String),
}

/// Parsed command with arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a SQL statement (terminating `;` already removed).
    Statement(String),
    /// Bind the session to a schema.
    Use(String),
    /// Inspect or change a session setting.
    Set(SetCommand),
    /// Show help message.
    Help,
    /// Exit the shell.
    Quit,
    /// Blank input.
    Empty,
}

/// Command router for parsing user input.
pub struct CommandRouter;

impl CommandRouter {
    /// Parse a complete input (possibly several lines) into a Command.
    pub fn parse(input: &str) -> Command {
        let input = strip_terminator(input);

        if input.is_empty() {
            return Command::Empty;
        }

        let (word, args) = match input.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (input, ""),
        };

        match word.to_lowercase().as_str() {
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "use" => Command::Use(args.to_string()),
            "set" => Command::Set(Self::parse_set_command(args)),
            _ => Command::Statement(input.to_string()),
        }
    }

    /// Parse `set` arguments.
    fn parse_set_command(args: &str) -> SetCommand {
        if args.is_empty() {
            return SetCommand::Show;
        }

        let (name, value) = match args.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim()),
            None => (args, ""),
        };

        match name.to_lowercase().as_str() {
            "format" if value.is_empty() => {
                SetCommand::Invalid("Usage: set format <FORMAT>".to_string())
            }
            "format" => match value.parse() {
                Ok(format) => SetCommand::Format(format),
                Err(e) => SetCommand::Invalid(e),
            },
            "debug" => match parse_bool(value) {
                Some(debug) => SetCommand::Debug(debug),
                None => SetCommand::Invalid(format!(
                    "Invalid value for debug: '{value}'. Expected on or off"
                )),
            },
            _ => SetCommand::Invalid(format!("Unknown setting: {name}")),
        }
    }

    /// Returns true if `input` starts a statement that may continue on later lines.
    pub fn is_multiline_start(input: &str) -> bool {
        let word = input.split_whitespace().next().unwrap_or("");
        MULTILINE_KEYWORDS
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(word))
    }
}

/// Parses the boolean spellings accepted by `set debug`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "t" | "yes" | "y" | "1" => Some(true),
        "off" | "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn strip_terminator(input: &str) -> &str {
    input.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

/// Accumulates input lines until they form a complete command.
#[derive(Debug, Default)]
pub struct StatementBuffer {
    lines: Vec<String>,
}

impl StatementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line. Returns the complete input once it is ready to parse.
    ///
    /// Multi-line statements complete at a line ending in `;`; everything
    /// else completes immediately.
    pub fn push(&mut self, line: &str) -> Option<String> {
        if self.lines.is_empty() && line.trim().is_empty() {
            return Some(String::new());
        }
        self.lines.push(line.to_string());

        let input = self.lines.join("\n");
        if CommandRouter::is_multiline_start(&input) && !input.trim_end().ends_with(';') {
            return None;
        }
        self.lines.clear();
        Some(input)
    }

    /// Returns true if a multi-line statement is in progress.
    pub fn is_pending(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Discards a partial statement.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
