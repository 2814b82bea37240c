//! Header-keyed records on Google Sheets.
//!
//! This crate authenticates with a service account, opens a spreadsheet by
//! its display name, and reads or appends [`Record`]s (ordered header →
//! value maps) on its worksheets.
//!
//! # Architecture
//!
//! ```text
//! Your Rust code
//!     └── SheetsClient / Spreadsheet / Worksheet (this crate)
//!           └── SheetsBackend
//!                 ├── RestBackend   → Sheets v4 + Drive v3 over HTTPS
//!                 └── MemoryBackend → in-process store
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use duke_gsheets::{Record, SheetsConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SheetsConfig::new("credentials.json", "sample_people_data");
//!
//!     let people = vec![
//!         Record::new().with("Name", "Alice").with("Age", 30).with("City", "New York"),
//!         Record::new().with("Name", "Bob").with("Age", 25).with("City", "Los Angeles"),
//!     ];
//!     duke_gsheets::write_records(&config, "people", &people)?;
//!
//!     for record in duke_gsheets::read_records(&config, 0)? {
//!         println!("{record}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod record;
pub mod rest;
pub mod spreadsheet;
pub mod worksheet;

pub use backend::SheetsBackend;
pub use config::SheetsConfig;
pub use credentials::ServiceAccount;
pub use error::{Result, SheetsError};
pub use gsheets_protocol::{CellValue, GridProperties, SheetProperties, SheetRef};
pub use memory::MemoryBackend;
pub use record::{records_from_csv, records_from_json, Record};
pub use rest::RestBackend;
pub use spreadsheet::{
    read_records, write_records, SheetsClient, Spreadsheet, DEFAULT_COLS, DEFAULT_ROWS,
};
pub use worksheet::Worksheet;
