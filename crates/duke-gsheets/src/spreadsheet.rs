//! Client and spreadsheet handles, including get-or-create worksheet
//! resolution.

use gsheets_protocol::SheetRef;

use crate::backend::SheetsBackend;
use crate::config::SheetsConfig;
use crate::error::{Result, SheetsError};
use crate::record::Record;
use crate::rest::RestBackend;
use crate::worksheet::Worksheet;

/// Row capacity of worksheets created on demand.
pub const DEFAULT_ROWS: u32 = 100;

/// Column capacity of worksheets created on demand.
pub const DEFAULT_COLS: u32 = 20;

/// Entry point for opening spreadsheets through a backend.
#[derive(Debug)]
pub struct SheetsClient<B> {
    backend: B,
}

impl SheetsClient<RestBackend> {
    /// Authenticate with the service account named in `config`.
    pub fn connect(config: &SheetsConfig) -> Result<Self> {
        Ok(Self::new(RestBackend::connect(config)?))
    }
}

impl<B: SheetsBackend> SheetsClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Open a spreadsheet by its display name.
    pub fn open(&self, name: &str) -> Result<Spreadsheet<'_, B>> {
        let id = self.backend.find_spreadsheet(name)?;
        tracing::debug!(name, id = %id, "opened spreadsheet");
        Ok(Spreadsheet {
            backend: &self.backend,
            id,
            name: name.to_string(),
        })
    }
}

/// A handle to one spreadsheet.
///
/// Holds no worksheet state: every lookup lists the worksheets again.
pub struct Spreadsheet<'a, B> {
    backend: &'a B,
    id: String,
    name: String,
}

impl<'a, B: SheetsBackend> Spreadsheet<'a, B> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All worksheets, in tab order.
    pub fn worksheets(&self) -> Result<Vec<Worksheet<'a, B>>> {
        Ok(self
            .backend
            .list_worksheets(&self.id)?
            .into_iter()
            .map(|props| Worksheet::new(self.backend, self.id.clone(), props))
            .collect())
    }

    /// First worksheet whose title matches `title` exactly.
    pub fn find_worksheet(&self, title: &str) -> Result<Option<Worksheet<'a, B>>> {
        Ok(self.worksheets()?.into_iter().find(|ws| ws.title() == title))
    }

    /// Look a worksheet up by position or title. Never creates one.
    pub fn worksheet(&self, sheet: impl Into<SheetRef>) -> Result<Worksheet<'a, B>> {
        let sheet = sheet.into();
        let found = match &sheet {
            SheetRef::Index(i) => self.worksheets()?.into_iter().nth(*i as usize),
            SheetRef::Name(title) => self.find_worksheet(title)?,
        };
        found.ok_or(SheetsError::WorksheetNotFound(sheet))
    }

    /// Create a worksheet unconditionally.
    pub fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<Worksheet<'a, B>> {
        tracing::info!(spreadsheet = %self.name, title, rows, cols, "creating worksheet");
        let props = self.backend.add_worksheet(&self.id, title, rows, cols)?;
        Ok(Worksheet::new(self.backend, self.id.clone(), props))
    }

    /// Return the worksheet titled `title`, creating it with a `rows`×`cols`
    /// grid when it does not exist. An existing worksheet is returned as is,
    /// whatever its size.
    ///
    /// The lookup and the creation are separate calls. Two callers racing on
    /// the same absent title can both create it.
    pub fn resolve_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<Worksheet<'a, B>> {
        match self.find_worksheet(title)? {
            Some(ws) => Ok(ws),
            None => self.add_worksheet(title, rows, cols),
        }
    }

    /// [`Spreadsheet::resolve_worksheet`] with a 100×20 grid.
    pub fn worksheet_or_create(&self, title: &str) -> Result<Worksheet<'a, B>> {
        self.resolve_worksheet(title, DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Records of the worksheet at position `index`.
    pub fn read_records(&self, index: u32) -> Result<Vec<Record>> {
        self.worksheet(index)?.records()
    }

    /// Append `records` to the worksheet titled `title`, creating it if
    /// needed. Does nothing at all for an empty slice.
    pub fn write_records(&self, title: &str, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let ws = self.worksheet_or_create(title)?;
        ws.append_records(records)?;
        Ok(())
    }
}

fn require_spreadsheet_name(config: &SheetsConfig) -> Result<&str> {
    if config.spreadsheet_name.is_empty() {
        return Err(SheetsError::Config("no spreadsheet name configured".into()));
    }
    Ok(&config.spreadsheet_name)
}

/// Authenticate, open the configured spreadsheet and read the records of
/// the worksheet at `worksheet_index`.
pub fn read_records(config: &SheetsConfig, worksheet_index: u32) -> Result<Vec<Record>> {
    let name = require_spreadsheet_name(config)?;
    let client = SheetsClient::connect(config)?;
    client.open(name)?.read_records(worksheet_index)
}

/// Authenticate, open the configured spreadsheet and append `records` to the
/// worksheet titled `worksheet`.
///
/// An empty `records` returns before any network call.
pub fn write_records(config: &SheetsConfig, worksheet: &str, records: &[Record]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let name = require_spreadsheet_name(config)?;
    let client = SheetsClient::connect(config)?;
    client.open(name)?.write_records(worksheet, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_write_nothing_skips_authentication() {
        // The key file does not exist, so reaching the network would fail.
        let config = SheetsConfig::new(PathBuf::from("/nonexistent/credentials.json"), "S");
        write_records(&config, "tab1", &[]).unwrap();
    }

    #[test]
    fn test_missing_spreadsheet_name() {
        let config = SheetsConfig::default();
        let err = read_records(&config, 0).unwrap_err();
        assert!(matches!(err, SheetsError::Config(_)), "{err}");
    }

    #[test]
    fn test_missing_credentials_surface_as_auth_error() {
        let config = SheetsConfig::new(PathBuf::from("/nonexistent/credentials.json"), "S");
        let err = write_records(&config, "tab1", &[Record::new().with("a", 1)]).unwrap_err();
        assert!(matches!(err, SheetsError::Authentication(_)), "{err}");
    }
}
