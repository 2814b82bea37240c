//! The remote operations the record layer is built on.

use gsheets_protocol::{CellValue, SheetProperties};

use crate::error::Result;

/// A store of spreadsheets reachable through six primitive calls.
///
/// [`RestBackend`](crate::rest::RestBackend) talks to the Google APIs;
/// [`MemoryBackend`](crate::memory::MemoryBackend) keeps everything in
/// process. Ranges are A1 strings built with [`gsheets_protocol::a1`].
pub trait SheetsBackend: Send + Sync {
    /// Resolve a spreadsheet's display name to its id.
    ///
    /// Fails with `SpreadsheetNotFound` when nothing accessible matches.
    fn find_spreadsheet(&self, name: &str) -> Result<String>;

    /// Worksheets of a spreadsheet, ordered by position.
    fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>>;

    /// Create a worksheet with the given grid size.
    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<SheetProperties>;

    /// Cell text of `range`, row-major, with trailing empty cells and rows
    /// trimmed.
    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;

    /// Append one row after the last non-empty row of the table at `range`.
    fn append_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()>;

    /// Overwrite the leading cells of the single row `range` (`'title'!N:N`).
    /// Cells past the end of `row` keep their contents.
    fn update_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()>;
}

impl<B: SheetsBackend + ?Sized> SheetsBackend for &B {
    fn find_spreadsheet(&self, name: &str) -> Result<String> {
        (**self).find_spreadsheet(name)
    }

    fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        (**self).list_worksheets(spreadsheet_id)
    }

    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<SheetProperties> {
        (**self).add_worksheet(spreadsheet_id, title, rows, cols)
    }

    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        (**self).get_values(spreadsheet_id, range)
    }

    fn append_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        (**self).append_row(spreadsheet_id, range, row)
    }

    fn update_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        (**self).update_row(spreadsheet_id, range, row)
    }
}
