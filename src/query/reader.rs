//! Paginated result reading.
//!
//! A [`ResultCursor`] turns the gateway's pages into a single forward-only
//! sequence of rows. Pages are fetched only when the current one is exhausted,
//! so memory use is bounded by the page size.
//!
//! The service sometimes returns the column names as the first data row of
//! the first page. The cursor drops that row once, when the first page
//! arrives, and never checks again.

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, StreamExt};
use tracing::debug;

use crate::error::{AthenaError, Result};
use crate::gateway::{Cell, ExecutionId, QueryGateway};

/// Text used for cells the gateway sent without a value.
pub const NULL_TEXT: &str = "NULL";

/// A rendered result row.
pub type Row = Vec<String>;

/// Forward-only cursor over a result set.
pub struct ResultCursor<'a> {
    gateway: &'a dyn QueryGateway,
    id: ExecutionId,
    header: Vec<String>,
    buffered: VecDeque<Row>,
    next_token: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
    rows_fetched: usize,
    rows_yielded: usize,
    header_row_skipped: bool,
}

impl<'a> ResultCursor<'a> {
    /// Fetches the first page and prepares the cursor.
    pub async fn open(gateway: &'a dyn QueryGateway, id: &ExecutionId) -> Result<Self> {
        let first = gateway.get_result_page(id, None).await?;
        let header = first.header.unwrap_or_default();

        let mut cursor = Self {
            gateway,
            id: id.clone(),
            header,
            buffered: VecDeque::new(),
            exhausted: first.next_token.is_none(),
            next_token: first.next_token,
            pages_fetched: 1,
            rows_fetched: 0,
            rows_yielded: 0,
            header_row_skipped: false,
        };
        cursor.buffer_rows(first.rows);
        cursor.header_row_skipped = strip_duplicate_header(&cursor.header, &mut cursor.buffered);
        if cursor.header_row_skipped {
            debug!(execution_id = %cursor.id, "Dropped header row repeated as data");
        }
        Ok(cursor)
    }

    /// Column names of the result set.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Returns the next row, fetching another page when needed.
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            if let Some(row) = self.buffered.pop_front() {
                self.rows_yielded += 1;
                return Ok(Some(row));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    /// Borrows the cursor as a stream of rows.
    pub fn rows(&mut self) -> BoxStream<'_, Result<Row>> {
        stream::try_unfold(self, |cursor| async move {
            let next = cursor.next_row().await?;
            Ok::<_, AthenaError>(next.map(|row| (row, cursor)))
        })
        .boxed()
    }

    /// Rows handed out so far; excludes a dropped header row.
    pub fn row_count(&self) -> usize {
        self.rows_yielded
    }

    /// Rows received from the gateway so far, including a dropped header row.
    pub fn rows_fetched(&self) -> usize {
        self.rows_fetched
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn header_row_skipped(&self) -> bool {
        self.header_row_skipped
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let token = self.next_token.take();
        let page = self
            .gateway
            .get_result_page(&self.id, token.as_deref())
            .await?;
        self.pages_fetched += 1;
        self.exhausted = page.next_token.is_none();
        self.next_token = page.next_token;
        debug!(
            execution_id = %self.id,
            page = self.pages_fetched,
            rows = page.rows.len(),
            "Fetched result page"
        );
        self.buffer_rows(page.rows);
        Ok(())
    }

    fn buffer_rows(&mut self, rows: Vec<Vec<Cell>>) {
        self.rows_fetched += rows.len();
        self.buffered.extend(rows.into_iter().map(render_row));
    }
}

/// Replaces missing cells with [`NULL_TEXT`].
pub fn render_row(cells: Vec<Cell>) -> Row {
    cells
        .into_iter()
        .map(|cell| cell.unwrap_or_else(|| NULL_TEXT.to_string()))
        .collect()
}

/// Drops the first row if it repeats the header. Returns whether it did.
///
/// An empty header or an empty page is never treated as a duplicate.
pub fn strip_duplicate_header(header: &[String], rows: &mut VecDeque<Row>) -> bool {
    if header.is_empty() {
        return false;
    }
    match rows.front() {
        Some(first) if first.as_slice() == header => {
            rows.pop_front();
            true
        }
        _ => false,
    }
}
