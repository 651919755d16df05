//! Streaming result formatter.
//!
//! `CSV`, `TSV` and `VERTICAL` write each row as soon as it arrives.
//! `ALIGNED` and `TRUNCATE` have to see every row before they can size their
//! columns, so they buffer the whole result set; prefer a delimited format for
//! very large results.

use std::io::{self, Write};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use futures::{Stream, StreamExt};

use super::{OutputFormat, Table};
use crate::error::{AthenaError, Result};
use crate::query::Row;

const TSV_ESCAPE: char = '\\';

/// Renders `rows` to `sink` in `format` and flushes the sink.
///
/// Returns the number of data rows written. A pipe closed by the reader
/// surfaces as [`AthenaError::SinkClosed`] so callers can tell it apart from
/// real I/O failures.
pub async fn render<S, W>(
    header: &[String],
    rows: S,
    format: OutputFormat,
    sink: &mut W,
) -> Result<usize>
where
    S: Stream<Item = Result<Row>>,
    W: Write,
{
    let rows = std::pin::pin!(rows);
    let written = match format {
        OutputFormat::Aligned | OutputFormat::Truncate => {
            render_aligned(header, rows, sink).await?
        }
        OutputFormat::Vertical => render_vertical(header, rows, sink).await?,
        OutputFormat::Csv
        | OutputFormat::CsvHeader
        | OutputFormat::Tsv
        | OutputFormat::TsvHeader => render_delimited(header, rows, format, sink).await?,
    };
    sink.flush().map_err(|e| write_error(e, written))?;
    Ok(written)
}

async fn render_aligned<S, W>(header: &[String], mut rows: S, sink: &mut W) -> Result<usize>
where
    S: Stream<Item = Result<Row>> + Unpin,
    W: Write,
{
    let mut buffered = Vec::new();
    while let Some(row) = rows.next().await {
        buffered.push(row?);
    }

    let table = Table::with_header(header, &buffered).render();
    sink.write_all(table.as_bytes()).map_err(|e| write_error(e, 0))?;
    Ok(buffered.len())
}

async fn render_vertical<S, W>(header: &[String], mut rows: S, sink: &mut W) -> Result<usize>
where
    S: Stream<Item = Result<Row>> + Unpin,
    W: Write,
{
    let mut written = 0;
    while let Some(row) = rows.next().await {
        let row = row?;
        let pairs: Vec<Vec<String>> = header
            .iter()
            .zip(row)
            .map(|(name, value)| vec![name.clone(), value])
            .collect();

        let block = format!(
            "--[RECORD {}]--\n{}",
            written + 1,
            Table::without_header(&pairs).render()
        );
        sink.write_all(block.as_bytes()).map_err(|e| write_error(e, written))?;
        written += 1;
    }
    Ok(written)
}

async fn render_delimited<S, W>(
    header: &[String],
    mut rows: S,
    format: OutputFormat,
    sink: &mut W,
) -> Result<usize>
where
    S: Stream<Item = Result<Row>> + Unpin,
    W: Write,
{
    let tsv = matches!(format, OutputFormat::Tsv | OutputFormat::TsvHeader);
    let mut builder = WriterBuilder::new();
    builder.terminator(Terminator::Any(b'\n'));
    if tsv {
        builder.delimiter(b'\t').quote_style(QuoteStyle::Never);
    } else {
        builder.delimiter(b',').quote_style(QuoteStyle::Always);
    }
    let mut writer = builder.from_writer(&mut *sink);

    let mut written = 0;
    if format.includes_header() {
        write_record(&mut writer, header, tsv).map_err(|e| csv_error(e, written))?;
    }
    while let Some(row) = rows.next().await {
        let row = row?;
        write_record(&mut writer, &row, tsv).map_err(|e| csv_error(e, written))?;
        written += 1;
    }
    writer.flush().map_err(|e| write_error(e, written))?;
    Ok(written)
}

fn write_record<W: Write>(
    writer: &mut csv::Writer<W>,
    fields: &[String],
    tsv: bool,
) -> csv::Result<()> {
    if tsv {
        writer.write_record(fields.iter().map(|f| escape_tsv(f)))
    } else {
        writer.write_record(fields)
    }
}

/// Backslash-escapes the delimiter, quote, escape and line-break characters.
pub fn escape_tsv(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        if matches!(c, '\t' | '"' | '\n' | '\r' | TSV_ESCAPE) {
            escaped.push(TSV_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn write_error(err: io::Error, rows_written: usize) -> AthenaError {
    if err.kind() == io::ErrorKind::BrokenPipe {
        AthenaError::SinkClosed { rows_written }
    } else {
        AthenaError::Io(err)
    }
}

fn csv_error(err: csv::Error, rows_written: usize) -> AthenaError {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => write_error(e, rows_written),
        other => AthenaError::internal(format!("Failed to encode row: {other:?}")),
    }
}
