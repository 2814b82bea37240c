//! Worksheet handle: reading records and header-aware appends.

use gsheets_protocol::{a1, CellValue, GridProperties, SheetProperties};

use crate::backend::SheetsBackend;
use crate::error::Result;
use crate::record::Record;

/// A handle to one worksheet of an open spreadsheet.
///
/// The properties are a snapshot taken when the handle was made; the grid
/// size in particular goes stale as rows are appended.
pub struct Worksheet<'a, B> {
    backend: &'a B,
    spreadsheet_id: String,
    props: SheetProperties,
}

impl<'a, B: SheetsBackend> Worksheet<'a, B> {
    pub(crate) fn new(backend: &'a B, spreadsheet_id: String, props: SheetProperties) -> Self {
        Self {
            backend,
            spreadsheet_id,
            props,
        }
    }

    pub fn title(&self) -> &str {
        &self.props.title
    }

    /// Service-assigned id, stable across renames.
    pub fn id(&self) -> i64 {
        self.props.sheet_id
    }

    /// Position among the spreadsheet's tabs.
    pub fn index(&self) -> u32 {
        self.props.index
    }

    pub fn grid(&self) -> GridProperties {
        self.props.grid_properties
    }

    pub fn properties(&self) -> &SheetProperties {
        &self.props
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Every used row, padded with `""` to a common width.
    pub fn all_values(&self) -> Result<Vec<Vec<String>>> {
        let mut rows = self
            .backend
            .get_values(&self.spreadsheet_id, &a1::sheet_range(&self.props.title))?;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Ok(rows)
    }

    /// Cells of row `row` (1-based), trailing blanks trimmed.
    pub fn row_values(&self, row: u32) -> Result<Vec<String>> {
        let rows = self
            .backend
            .get_values(&self.spreadsheet_id, &a1::row_range(&self.props.title, row))?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// The first row as headers, every later row as a [`Record`].
    ///
    /// Values come back as text. A sheet that is empty or holds only the
    /// header row yields no records.
    pub fn records(&self) -> Result<Vec<Record>> {
        let rows = self
            .backend
            .get_values(&self.spreadsheet_id, &a1::sheet_range(&self.props.title))?;
        let mut rows = rows.into_iter();
        let Some(headers) = rows.next() else {
            return Ok(Vec::new());
        };
        Ok(rows.map(|row| Record::from_row(&headers, &row)).collect())
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Append one row after the last non-empty row.
    pub fn append_row(&self, row: &[CellValue]) -> Result<()> {
        self.backend
            .append_row(&self.spreadsheet_id, &a1::sheet_range(&self.props.title), row)
    }

    /// The header row in effect: row 1 with trailing blank cells dropped.
    /// Empty when row 1 holds nothing but whitespace.
    pub fn header(&self) -> Result<Vec<String>> {
        Ok(header_cells(self.row_values(1)?))
    }

    /// Whether the first row holds any non-blank cell.
    pub fn has_header(&self) -> Result<bool> {
        Ok(!self.header()?.is_empty())
    }

    /// Return the header rows are aligned to, writing `headers` into row 1
    /// first when that row is empty or blank.
    ///
    /// An existing header is returned as found and never compared against
    /// `headers` or rewritten.
    pub fn ensure_header(&self, headers: &[String]) -> Result<Vec<String>> {
        let current = self.row_values(1)?;
        let width = current.len();
        let existing = header_cells(current);
        if !existing.is_empty() {
            return Ok(existing);
        }

        tracing::info!(worksheet = %self.props.title, ?headers, "writing header row");
        let mut row: Vec<CellValue> = headers.iter().map(|h| CellValue::from(h.as_str())).collect();
        // clear leftover whitespace cells
        if row.len() < width {
            row.resize(width, CellValue::default());
        }
        self.backend.update_row(
            &self.spreadsheet_id,
            &a1::row_range(&self.props.title, 1),
            &row,
        )?;
        Ok(headers.to_vec())
    }

    /// Header-aware append of `records`, one call per record.
    ///
    /// Rows follow the worksheet's existing header, or the first record's
    /// keys when there is none. Each row holds that record's value for every
    /// header, or `""` when it lacks the key; keys outside the header set are
    /// dropped. A failure part way leaves the rows already appended in
    /// place. Returns the number of data rows written.
    pub fn append_records(&self, records: &[Record]) -> Result<usize> {
        let Some(first) = records.first() else {
            return Ok(0);
        };
        let headers = self.ensure_header(&first.headers())?;

        for record in records {
            self.append_row(&record.to_row(&headers))?;
        }
        tracing::debug!(worksheet = %self.props.title, rows = records.len(), "appended records");
        Ok(records.len())
    }
}

fn header_cells(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }
    cells
}
