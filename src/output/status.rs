//! Single-line progress display for a running query.

use std::io::{self, Write};

use crate::gateway::{ExecutionId, QueryStatus};

/// Rewrites one terminal line with the latest query state.
pub struct StatusLine<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> StatusLine<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 0 }
    }

    /// Overwrites the line with `Query <id>, <STATE>`.
    pub fn update(&mut self, id: &ExecutionId, status: &QueryStatus) -> io::Result<()> {
        let line = format!("Query {id}, {:9}", status.state);
        self.width = self.width.max(line.len());
        write!(self.out, "\r{line}")?;
        self.out.flush()
    }

    /// Blanks the line and returns the cursor to its start.
    pub fn clear(&mut self) -> io::Result<()> {
        if self.width == 0 {
            return Ok(());
        }
        write!(self.out, "\r{}\r", " ".repeat(self.width))?;
        self.width = 0;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
