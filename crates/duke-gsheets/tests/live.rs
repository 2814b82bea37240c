//! Tests against the real Google APIs.
//!
//! These need a service-account key and a spreadsheet shared with that
//! account:
//!
//!   GSHEETS_CREDENTIALS=/path/to/key.json \
//!   GSHEETS_TEST_SPREADSHEET="my test sheet" \
//!   cargo test -p duke-gsheets --test live
//!
//! Without both variables every test is skipped. The tests append to a
//! worksheet named `duke-gsheets-live`, creating it on first run.

use duke_gsheets::{Record, SheetsClient, SheetsConfig, SheetsError};

const WORKSHEET: &str = "duke-gsheets-live";

fn live_config() -> Option<SheetsConfig> {
    let credentials = std::env::var_os("GSHEETS_CREDENTIALS")?;
    let spreadsheet = std::env::var("GSHEETS_TEST_SPREADSHEET").ok()?;
    Some(SheetsConfig::new(credentials, spreadsheet))
}

/// Skip this test unless live credentials are configured.
macro_rules! skip_if_no_credentials {
    () => {
        match live_config() {
            Some(config) => config,
            None => {
                eprintln!(
                    "SKIP: set GSHEETS_CREDENTIALS and GSHEETS_TEST_SPREADSHEET \
                     to run the live Sheets tests"
                );
                return;
            }
        }
    };
}

#[test]
fn test_connect_and_list_worksheets() {
    let config = skip_if_no_credentials!();

    let client = SheetsClient::connect(&config).expect("connect");
    let ss = client.open(&config.spreadsheet_name).expect("open");
    let worksheets = ss.worksheets().expect("worksheets");
    assert!(!worksheets.is_empty());
    for ws in &worksheets {
        eprintln!("  {}\t{}", ws.index(), ws.title());
    }
}

#[test]
fn test_append_then_read_back() {
    let config = skip_if_no_credentials!();

    let marker = chrono::Utc::now().timestamp_millis().to_string();
    let record = Record::new().with("Run", marker.as_str()).with("Age", 30);
    duke_gsheets::write_records(&config, WORKSHEET, &[record]).expect("write");

    let client = SheetsClient::connect(&config).expect("connect");
    let ss = client.open(&config.spreadsheet_name).expect("open");
    let index = ss.worksheet(WORKSHEET).expect("worksheet").index();
    let records = ss.read_records(index).expect("read");

    let ours = records
        .iter()
        .find(|r| r.get("Run").map(|v| v.to_text()) == Some(marker.clone()))
        .expect("appended record not found");
    assert_eq!(ours.get("Age").map(|v| v.to_text()), Some("30".to_string()));
}

#[test]
fn test_unknown_spreadsheet() {
    let config = skip_if_no_credentials!();

    let client = SheetsClient::connect(&config).expect("connect");
    match client.open("duke-gsheets: no spreadsheet has this name") {
        Err(SheetsError::SpreadsheetNotFound(_)) => {}
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("expected SpreadsheetNotFound"),
    }
}
