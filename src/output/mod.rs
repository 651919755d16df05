//! Result rendering for the Athena console.
//!
//! Formats a header plus a lazy row stream into one of the supported output
//! formats, and provides the sinks the front ends write to (pager, status
//! line).

mod format;
pub mod pager;
pub mod status;
mod table;

pub use format::render;
pub use pager::{Pager, DEFAULT_PAGER, TRUNCATE_PAGER};
pub use status::StatusLine;
pub use table::Table;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selectable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputFormat {
    /// Presto-style table. Buffers the whole result set to size columns.
    Aligned,
    /// As `Aligned`, paged with long lines chopped instead of wrapped.
    Truncate,
    /// One labelled two-column block per row.
    Vertical,
    /// Comma-separated, every field quoted.
    Csv,
    /// As `Csv`, preceded by a header record.
    CsvHeader,
    /// Tab-separated, backslash-escaped, never quoted.
    Tsv,
    /// As `Tsv`, preceded by a header record.
    TsvHeader,
}

impl OutputFormat {
    /// All formats, in the order they are listed to users.
    pub const ALL: [OutputFormat; 7] = [
        Self::Aligned,
        Self::Truncate,
        Self::Vertical,
        Self::Csv,
        Self::Tsv,
        Self::CsvHeader,
        Self::TsvHeader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aligned => "ALIGNED",
            Self::Truncate => "TRUNCATE",
            Self::Vertical => "VERTICAL",
            Self::Csv => "CSV",
            Self::CsvHeader => "CSV_HEADER",
            Self::Tsv => "TSV",
            Self::TsvHeader => "TSV_HEADER",
        }
    }

    /// Returns true if a header record precedes the data.
    pub fn includes_header(&self) -> bool {
        matches!(self, Self::CsvHeader | Self::TsvHeader)
    }

    /// Returns true if rows are written as they arrive, without buffering.
    pub fn is_streaming(&self) -> bool {
        !matches!(self, Self::Aligned | Self::Truncate)
    }

    /// Default pager command line for interactive output in this format.
    pub fn default_pager(&self) -> &'static str {
        match self {
            Self::Truncate => TRUNCATE_PAGER,
            _ => DEFAULT_PAGER,
        }
    }

    /// Default format for the interactive shell.
    pub fn shell_default() -> Self {
        Self::Aligned
    }

    /// Default format for batch mode.
    pub fn batch_default() -> Self {
        Self::Csv
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                format!(
                    "Invalid output format: {s}. Expected one of: {}",
                    names.join(", ")
                )
            })
    }
}
