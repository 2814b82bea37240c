//! Error types for duke-gsheets.

use gsheets_protocol::SheetRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(SheetRef),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetsError {
    pub(crate) fn auth<S: Into<String>>(msg: S) -> Self {
        SheetsError::Authentication(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SheetsError>;
