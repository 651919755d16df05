//! Pager process for interactive result output.
//!
//! Results are piped into an external pager (`less -FXRn` unless configured
//! otherwise). If the pager cannot be started, output goes straight to stdout.

use std::io::{self, Stdout, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, warn};

/// Default pager command line.
pub const DEFAULT_PAGER: &str = "less -FXRn";

/// Pager command line for the `TRUNCATE` format: chops long lines.
pub const TRUNCATE_PAGER: &str = "less -FXRSn";

enum Target {
    Process { child: Child, stdin: Option<ChildStdin> },
    Stdout(Stdout),
}

/// A writer that feeds a pager process, or stdout as a fallback.
pub struct Pager {
    target: Target,
}

impl Pager {
    /// Starts `command` with a piped stdin.
    ///
    /// `command` is split on whitespace; the first word is the program. An
    /// empty command or a failed spawn falls back to stdout.
    pub fn spawn(command: &str) -> Self {
        let mut words = command.split_whitespace();
        let Some(program) = words.next() else {
            return Self::stdout();
        };

        match Command::new(program)
            .args(words)
            .stdin(Stdio::piped())
            .spawn()
        {
            Ok(mut child) => {
                debug!(pager = command, "Started pager");
                let stdin = child.stdin.take();
                Self {
                    target: Target::Process { child, stdin },
                }
            }
            Err(e) => {
                warn!(pager = command, error = %e, "Failed to start pager, writing to stdout");
                Self::stdout()
            }
        }
    }

    /// A pager that writes directly to stdout.
    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout(io::stdout()),
        }
    }

    /// Returns true if output is going to a pager process.
    pub fn is_process(&self) -> bool {
        matches!(self.target, Target::Process { .. })
    }

    /// Closes the pager's input and waits for the user to quit it.
    pub fn finish(self) -> io::Result<()> {
        match self.target {
            Target::Process { mut child, stdin } => {
                drop(stdin);
                let status = child.wait()?;
                debug!(?status, "Pager exited");
                Ok(())
            }
            Target::Stdout(mut out) => out.flush(),
        }
    }
}

impl Write for Pager {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.target {
            Target::Process { stdin: Some(stdin), .. } => stdin.write(buf),
            Target::Process { stdin: None, .. } => Err(io::ErrorKind::BrokenPipe.into()),
            Target::Stdout(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            Target::Process { stdin: Some(stdin), .. } => stdin.flush(),
            Target::Process { stdin: None, .. } => Ok(()),
            Target::Stdout(out) => out.flush(),
        }
    }
}
