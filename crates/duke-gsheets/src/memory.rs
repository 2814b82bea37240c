//! In-process backend.
//!
//! Mirrors the behavior of the REST APIs that the record layer depends on:
//! values come back as text with trailing blanks trimmed, appends land after
//! the last non-empty row and grow the grid, and new spreadsheets start with
//! a single `Sheet1`. Worksheet titles are *not* forced unique, so
//! check-then-create races show up as duplicate tabs.

use std::sync::{Mutex, MutexGuard};

use gsheets_protocol::{CellValue, GridProperties, SheetProperties};

use crate::backend::SheetsBackend;
use crate::error::{Result, SheetsError};

#[derive(Debug)]
struct MemorySheet {
    props: SheetProperties,
    cells: Vec<Vec<String>>,
}

impl MemorySheet {
    /// Number of rows up to and including the last one holding any text.
    fn used_rows(&self) -> usize {
        self.cells
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1)
    }
}

#[derive(Debug)]
struct MemorySpreadsheet {
    id: String,
    name: String,
    sheets: Vec<MemorySheet>,
}

#[derive(Debug, Default)]
struct State {
    spreadsheets: Vec<MemorySpreadsheet>,
    next_sheet_id: i64,
    mutations: usize,
}

impl State {
    fn spreadsheet_mut(&mut self, id: &str) -> Result<&mut MemorySpreadsheet> {
        self.spreadsheets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SheetsError::Api {
                status: 404,
                message: format!("Requested entity was not found: {id}"),
            })
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a spreadsheet holding one empty `Sheet1` (1000×26). Returns its id.
    ///
    /// Setup calls like this one are not counted by [`MemoryBackend::mutations`].
    pub fn create_spreadsheet(&self, name: &str) -> String {
        let mut state = self.state();
        let id = format!("mem-{}", state.spreadsheets.len() + 1);
        let sheet_id = state.next_sheet_id;
        state.next_sheet_id += 1;
        state.spreadsheets.push(MemorySpreadsheet {
            id: id.clone(),
            name: name.to_string(),
            sheets: vec![MemorySheet {
                props: SheetProperties {
                    sheet_id,
                    title: "Sheet1".to_string(),
                    index: 0,
                    grid_properties: GridProperties {
                        row_count: 1000,
                        column_count: 26,
                    },
                },
                cells: Vec::new(),
            }],
        });
        id
    }

    /// Overwrite the contents of the first worksheet titled `title`.
    pub fn set_values(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        let mut state = self.state();
        let sheet = state
            .spreadsheet_mut(spreadsheet_id)?
            .sheets
            .iter_mut()
            .find(|s| s.props.title == title)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.into()))?;
        sheet.cells = rows;
        Ok(())
    }

    /// Raw cell text of the first worksheet titled `title`.
    pub fn values(&self, spreadsheet_id: &str, title: &str) -> Option<Vec<Vec<String>>> {
        let state = self.state();
        let spreadsheet = state.spreadsheets.iter().find(|s| s.id == spreadsheet_id)?;
        let sheet = spreadsheet.sheets.iter().find(|s| s.props.title == title)?;
        Some(sheet.cells[..sheet.used_rows()].to_vec())
    }

    /// Count of `add_worksheet`, `append_row` and `update_row` calls that
    /// succeeded.
    pub fn mutations(&self) -> usize {
        self.state().mutations
    }
}

/// Split `'title'` or `'title'!N:N` into the title and optional 1-based row.
fn parse_range(range: &str) -> Option<(String, Option<usize>)> {
    let rest = range.strip_prefix('\'')?;
    let mut title = String::new();
    let mut chars = rest.char_indices().peekable();
    let tail = loop {
        let (i, c) = chars.next()?;
        if c == '\'' {
            if let Some((_, '\'')) = chars.peek() {
                chars.next();
                title.push('\'');
                continue;
            }
            break &rest[i + 1..];
        }
        title.push(c);
    };

    if tail.is_empty() {
        return Some((title, None));
    }
    let (start, end) = tail.strip_prefix('!')?.split_once(':')?;
    if start != end {
        return None;
    }
    let row: usize = start.parse().ok().filter(|r| *r > 0)?;
    Some((title, Some(row)))
}

fn trim_row(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

fn bad_range(range: &str) -> SheetsError {
    SheetsError::Api {
        status: 400,
        message: format!("Unable to parse range: {range}"),
    }
}

impl SheetsBackend for MemoryBackend {
    fn find_spreadsheet(&self, name: &str) -> Result<String> {
        self.state()
            .spreadsheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.id.clone())
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let mut state = self.state();
        let spreadsheet = state.spreadsheet_mut(spreadsheet_id)?;
        Ok(spreadsheet.sheets.iter().map(|s| s.props.clone()).collect())
    }

    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<SheetProperties> {
        let mut state = self.state();
        let sheet_id = state.next_sheet_id;
        let spreadsheet = state.spreadsheet_mut(spreadsheet_id)?;
        let props = SheetProperties {
            sheet_id,
            title: title.to_string(),
            index: spreadsheet.sheets.len() as u32,
            grid_properties: GridProperties {
                row_count: rows,
                column_count: cols,
            },
        };
        spreadsheet.sheets.push(MemorySheet {
            props: props.clone(),
            cells: Vec::new(),
        });
        state.next_sheet_id += 1;
        state.mutations += 1;
        Ok(props)
    }

    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let (title, row) = parse_range(range).ok_or_else(|| bad_range(range))?;
        let mut state = self.state();
        let spreadsheet = state.spreadsheet_mut(spreadsheet_id)?;
        let sheet = spreadsheet
            .sheets
            .iter()
            .find(|s| s.props.title == title)
            .ok_or_else(|| bad_range(range))?;

        let used = &sheet.cells[..sheet.used_rows()];
        let rows: Vec<Vec<String>> = match row {
            None => used.to_vec(),
            Some(n) => used.get(n - 1).cloned().into_iter().collect(),
        };
        let mut rows: Vec<Vec<String>> = rows.into_iter().map(trim_row).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    fn append_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        let (title, _) = parse_range(range).ok_or_else(|| bad_range(range))?;
        let mut state = self.state();
        let spreadsheet = state.spreadsheet_mut(spreadsheet_id)?;
        let sheet = spreadsheet
            .sheets
            .iter_mut()
            .find(|s| s.props.title == title)
            .ok_or_else(|| bad_range(range))?;

        let at = sheet.used_rows();
        sheet.cells.truncate(at);
        sheet.cells.push(row.iter().map(CellValue::to_text).collect());

        let grid = &mut sheet.props.grid_properties;
        grid.row_count = grid.row_count.max(sheet.cells.len() as u32);
        grid.column_count = grid.column_count.max(row.len() as u32);

        state.mutations += 1;
        Ok(())
    }

    fn update_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        let (title, number) = parse_range(range).ok_or_else(|| bad_range(range))?;
        let number = number.ok_or_else(|| bad_range(range))?;
        let mut state = self.state();
        let spreadsheet = state.spreadsheet_mut(spreadsheet_id)?;
        let sheet = spreadsheet
            .sheets
            .iter_mut()
            .find(|s| s.props.title == title)
            .ok_or_else(|| bad_range(range))?;

        if sheet.cells.len() < number {
            sheet.cells.resize(number, Vec::new());
        }
        let target = &mut sheet.cells[number - 1];
        if target.len() < row.len() {
            target.resize(row.len(), String::new());
        }
        for (cell, value) in target.iter_mut().zip(row) {
            *cell = value.to_text();
        }

        let grid = &mut sheet.props.grid_properties;
        grid.row_count = grid.row_count.max(number as u32);
        grid.column_count = grid.column_count.max(row.len() as u32);

        state.mutations += 1;
        Ok(())
    }
}
