//! Interactive shell.
//!
//! Reads input with rustyline, accumulates multi-line statements until the
//! terminating `;`, dispatches shell commands and runs statements with a live
//! status line. Results go through the pager.
//!
//! Ctrl-C at the prompt discards the current input. Ctrl-C while a query is
//! running cancels that query and returns to the prompt; while results are
//! paged it stops the output.

use std::io;
use std::path::PathBuf;

use futures::StreamExt;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::commands::{dispatch, CommandResult, CommandRouter, StatementBuffer};
use crate::config::ShellConfig;
use crate::error::{AthenaError, Result};
use crate::gateway::{ExecutionId, QueryState};
use crate::interrupt::Interrupts;
use crate::output::{self, Pager, StatusLine};
use crate::query::stats::console_link;
use crate::query::{QueryExecution, ResultCursor};
use crate::session::Session;

const CONTINUATION_PROMPT: &str = "    -> ";

/// The interactive read-eval-print loop.
pub struct Shell {
    session: Session,
    editor: DefaultEditor,
    buffer: StatementBuffer,
    interrupts: Interrupts,
    config: ShellConfig,
    history_path: PathBuf,
}

impl Shell {
    /// Creates the shell and loads the history file.
    ///
    /// `interrupts` must already be installed so a Ctrl-C during the first
    /// statement reaches it.
    pub fn new(session: Session, config: &ShellConfig, interrupts: Interrupts) -> Result<Self> {
        let editor_config = rustyline::Config::builder()
            .max_history_size(config.history_size)
            .map_err(editor_error)?
            .auto_add_history(false)
            .build();
        let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

        let history_path = config.history_path();
        if let Err(e) = editor.load_history(&history_path) {
            debug!(path = %history_path.display(), error = %e, "No history loaded");
        }

        Ok(Self {
            session,
            editor,
            buffer: StatementBuffer::new(),
            interrupts,
            config: config.clone(),
            history_path,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `quit`, `exit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let prompt = if self.buffer.is_pending() {
                CONTINUATION_PROMPT.to_string()
            } else {
                self.session.prompt()
            };

            let line = match self.editor.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    self.buffer.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    self.save_history();
                    return Err(editor_error(e));
                }
            };

            let Some(input) = self.buffer.push(&line) else {
                continue;
            };
            if !input.trim().is_empty() {
                if let Err(e) = self.editor.add_history_entry(input.as_str()) {
                    debug!(error = %e, "Failed to add history entry");
                }
            }

            match dispatch(&mut self.session, CommandRouter::parse(&input)) {
                CommandResult::Message(text) => println!("{text}"),
                CommandResult::Error(text) => eprintln!("{text}"),
                CommandResult::Execute(sql) => {
                    if let Err(e) = self.run_statement(&sql).await {
                        eprintln!("{e}");
                    }
                }
                CommandResult::Exit => break,
                CommandResult::None => {}
            }
        }

        self.save_history();
        Ok(())
    }

    /// Submits one statement, waits for it, pages its results and prints the report.
    async fn run_statement(&self, sql: &str) -> Result<()> {
        let cancel = self.interrupts.arm();
        let controller = self.session.controller();
        let id = controller.submit(self.session.schema(), sql).await?;

        let mut status_line = StatusLine::new(io::stdout());
        let outcome = controller
            .await_completion(&id, &cancel, |status| {
                if let Err(e) = status_line.update(&id, status) {
                    debug!(error = %e, "Failed to draw status line");
                }
            })
            .await;
        status_line.clear()?;
        let execution = outcome?;

        let region = self.session.gateway().region();
        if execution.cancelled_by_user {
            println!("\n\n{}", console_link(region, execution.id.as_str()));
            println!("\nQuery aborted by user");
            return Ok(());
        }

        if execution.succeeded() {
            let rows = self.page_results(&id, &cancel).await?;
            println!("({rows} rows)\n");
        }

        println!("{}", execution_report(&execution, region));
        if self.session.debug() {
            match serde_json::to_string_pretty(&execution) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!(error = %e, "Failed to serialize execution"),
            }
        }
        Ok(())
    }

    /// Streams the result set into the pager until it ends or `cancel` fires.
    /// Returns the rows written.
    async fn page_results(&self, id: &ExecutionId, cancel: &CancellationToken) -> Result<usize> {
        let mut cursor = ResultCursor::open(self.session.gateway(), id).await?;
        let header = cursor.header().to_vec();
        let format = self.session.format();

        let mut pager = Pager::spawn(self.config.pager_command(format));
        let rows = cursor.rows().take_until(cancel.cancelled());
        let rendered = output::render(&header, rows, format, &mut pager).await;
        let finished = pager.finish();
        if cancel.is_cancelled() {
            debug!(execution_id = %id, "Output interrupted");
        }

        let rows = match rendered {
            Ok(rows) => rows,
            Err(AthenaError::SinkClosed { rows_written }) => {
                debug!(rows_written, "Pager closed before the end of the results");
                rows_written
            }
            Err(e) => return Err(e),
        };
        finished?;
        Ok(rows)
    }

    fn save_history(&mut self) {
        if let Err(e) = self.editor.save_history(&self.history_path) {
            warn!(path = %self.history_path.display(), error = %e, "Failed to save history");
        }
    }
}

/// The lines printed after a statement finishes: state, failure reason,
/// console link and statistics.
pub fn execution_report(execution: &QueryExecution, region: &str) -> String {
    let mut lines = vec![format!("Query {}, {}", execution.id, execution.state)];
    if execution.state == QueryState::Failed {
        lines.push(execution.failure_reason.clone().unwrap_or_default());
    }
    lines.push(console_link(region, execution.id.as_str()));
    lines.push(format!("{}\n", execution.summary()));
    lines.join("\n")
}

fn editor_error(e: ReadlineError) -> AthenaError {
    AthenaError::internal(format!("Line editor error: {e}"))
}
