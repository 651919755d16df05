//! Result streaming integration tests.
//!
//! Tests paging through multi-page result sets and rendering them in each
//! output format.

use athena_cli::error::AthenaError;
use athena_cli::gateway::{ExecutionId, MockGateway, ResultPage};
use athena_cli::output::{self, OutputFormat};
use athena_cli::query::ResultCursor;
use pretty_assertions::assert_eq;
use std::io::{self, Write};

fn page(header: &[&str], rows: &[&[Option<&str>]]) -> ResultPage {
    ResultPage {
        header: Some(header.iter().map(|h| h.to_string()).collect()),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| c.map(String::from)).collect())
            .collect(),
        next_token: None,
    }
}

/// Three pages; the first repeats the header as its first row.
fn paged_mock() -> MockGateway {
    MockGateway::new().with_pages(vec![
        page(&["id", "city"], &[&[Some("id"), Some("city")], &[Some("1"), Some("Oslo")]]),
        page(&["id", "city"], &[&[Some("2"), None]]),
        page(&["id", "city"], &[&[Some("3"), Some("Lima")]]),
    ])
}

async fn render_all(mock: &MockGateway, format: OutputFormat) -> (String, usize) {
    let id = ExecutionId::from("mock-1");
    let mut cursor = ResultCursor::open(mock, &id).await.unwrap();
    let header = cursor.header().to_vec();
    let mut sink = Vec::new();
    let rows = output::render(&header, cursor.rows(), format, &mut sink)
        .await
        .unwrap();
    (String::from_utf8(sink).unwrap(), rows)
}

#[tokio::test]
async fn test_csv_across_pages() {
    let mock = paged_mock();
    let (text, rows) = render_all(&mock, OutputFormat::Csv).await;

    assert_eq!(text, "\"1\",\"Oslo\"\n\"2\",\"NULL\"\n\"3\",\"Lima\"\n");
    assert_eq!(rows, 3);
    assert_eq!(mock.page_calls(), 3);
}

#[tokio::test]
async fn test_tsv_header_across_pages() {
    let mock = paged_mock();
    let (text, rows) = render_all(&mock, OutputFormat::TsvHeader).await;

    assert_eq!(text, "id\tcity\n1\tOslo\n2\tNULL\n3\tLima\n");
    assert_eq!(rows, 3);
}

#[tokio::test]
async fn test_aligned_across_pages() {
    let mock = paged_mock();
    let (text, rows) = render_all(&mock, OutputFormat::Aligned).await;

    assert_eq!(
        text,
        " id | city\n----+------\n  1 | Oslo\n  2 | NULL\n  3 | Lima\n"
    );
    assert_eq!(rows, 3);
}

#[tokio::test]
async fn test_vertical_numbers_records() {
    let mock = paged_mock();
    let (text, rows) = render_all(&mock, OutputFormat::Vertical).await;

    assert!(text.starts_with("--[RECORD 1]--\n id   | 1\n city | Oslo\n"));
    assert!(text.contains("--[RECORD 3]--\n"));
    assert_eq!(rows, 3);
}

#[tokio::test]
async fn test_empty_result_set() {
    let mock = MockGateway::new().with_pages(vec![page(&["id"], &[])]);
    let (text, rows) = render_all(&mock, OutputFormat::CsvHeader).await;

    assert_eq!(text, "\"id\"\n");
    assert_eq!(rows, 0);
}

/// Accepts `budget` writes, then reports a closed pipe.
struct ClosingPipe {
    budget: usize,
}

impl Write for ClosingPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.budget -= 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_closed_reader_reports_rows_written() {
    let mock = paged_mock();
    let id = ExecutionId::from("mock-1");
    let mut cursor = ResultCursor::open(&mock, &id).await.unwrap();
    let header = cursor.header().to_vec();

    let err = output::render(
        &header,
        cursor.rows(),
        OutputFormat::Vertical,
        &mut ClosingPipe { budget: 1 },
    )
    .await
    .unwrap_err();

    match err {
        AthenaError::SinkClosed { rows_written } => assert_eq!(rows_written, 1),
        other => panic!("expected SinkClosed, got {other:?}"),
    }
}
