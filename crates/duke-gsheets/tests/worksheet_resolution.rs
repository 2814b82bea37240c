//! Tests for worksheet lookup and get-or-create resolution.

use std::sync::Barrier;

use duke_gsheets::{
    CellValue, MemoryBackend, Result, SheetProperties, SheetRef, SheetsBackend, SheetsClient,
    SheetsError,
};

fn client_with(name: &str) -> (SheetsClient<MemoryBackend>, String) {
    let backend = MemoryBackend::new();
    let id = backend.create_spreadsheet(name);
    (SheetsClient::new(backend), id)
}

/// Resolving an existing title twice hands back the same worksheet.
#[test]
fn test_resolve_existing_is_idempotent() {
    let (client, _) = client_with("S");
    let ss = client.open("S").unwrap();

    let first = ss.worksheet_or_create("Sheet1").unwrap();
    let second = ss.worksheet_or_create("Sheet1").unwrap();
    assert_eq!(first.id(), second.id());
    assert_eq!(ss.worksheets().unwrap().len(), 1);
    assert_eq!(client.backend().mutations(), 0);
}

/// An existing worksheet is returned without any resize.
#[test]
fn test_resolve_existing_ignores_requested_size() {
    let (client, _) = client_with("S");
    let ss = client.open("S").unwrap();

    let ws = ss.resolve_worksheet("Sheet1", 5, 5).unwrap();
    assert_eq!(ws.grid().row_count, 1000);
    assert_eq!(ws.grid().column_count, 26);
}

/// An absent title is created exactly once, 100×20 by default.
#[test]
fn test_resolve_absent_creates_once_with_defaults() {
    let (client, _) = client_with("S");
    let ss = client.open("S").unwrap();

    let created = ss.worksheet_or_create("tab1").unwrap();
    assert_eq!(created.title(), "tab1");
    assert_eq!(created.grid().row_count, 100);
    assert_eq!(created.grid().column_count, 20);
    assert_eq!(created.index(), 1);

    let again = ss.worksheet_or_create("tab1").unwrap();
    assert_eq!(again.id(), created.id());

    let titles: Vec<String> = ss
        .worksheets()
        .unwrap()
        .iter()
        .map(|ws| ws.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Sheet1", "tab1"]);
    assert_eq!(client.backend().mutations(), 1);
}

/// Custom dimensions are used for creation.
#[test]
fn test_resolve_absent_with_custom_size() {
    let (client, _) = client_with("S");
    let ss = client.open("S").unwrap();

    let ws = ss.resolve_worksheet("wide", 10, 52).unwrap();
    assert_eq!(ws.grid().row_count, 10);
    assert_eq!(ws.grid().column_count, 52);
}

/// Title matching is exact and case-sensitive.
#[test]
fn test_resolve_is_case_sensitive() {
    let (client, _) = client_with("S");
    let ss = client.open("S").unwrap();

    let lower = ss.worksheet_or_create("sheet1").unwrap();
    assert_ne!(lower.title(), "Sheet1");
    assert_eq!(ss.worksheets().unwrap().len(), 2);
}

/// Strict lookups surface `WorksheetNotFound` and never create.
#[test]
fn test_strict_lookup_errors() {
    let (client, _) = client_with("S");
    let ss = client.open("S").unwrap();

    match ss.worksheet(3) {
        Err(SheetsError::WorksheetNotFound(SheetRef::Index(3))) => {}
        other => panic!(
            "expected WorksheetNotFound, got {:?}",
            other.map(|ws| ws.title().to_string())
        ),
    }
    match ss.worksheet("missing") {
        Err(SheetsError::WorksheetNotFound(SheetRef::Name(name))) => assert_eq!(name, "missing"),
        other => panic!(
            "expected WorksheetNotFound, got {:?}",
            other.map(|ws| ws.title().to_string())
        ),
    }
    assert_eq!(client.backend().mutations(), 0);
}

/// Opening an unknown spreadsheet name fails.
#[test]
fn test_open_unknown_spreadsheet() {
    let (client, _) = client_with("S");
    match client.open("T") {
        Err(SheetsError::SpreadsheetNotFound(name)) => assert_eq!(name, "T"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("expected SpreadsheetNotFound"),
    }
}

/// Wraps a backend so that every caller finishes listing worksheets before
/// any of them continues.
struct ListThenWait<'a> {
    inner: &'a MemoryBackend,
    barrier: Barrier,
}

impl SheetsBackend for ListThenWait<'_> {
    fn find_spreadsheet(&self, name: &str) -> Result<String> {
        self.inner.find_spreadsheet(name)
    }

    fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let sheets = self.inner.list_worksheets(spreadsheet_id);
        self.barrier.wait();
        sheets
    }

    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<SheetProperties> {
        self.inner.add_worksheet(spreadsheet_id, title, rows, cols)
    }

    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        self.inner.get_values(spreadsheet_id, range)
    }

    fn append_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        self.inner.append_row(spreadsheet_id, range, row)
    }

    fn update_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        self.inner.update_row(spreadsheet_id, range, row)
    }
}

/// Check-then-act creation has no lock: two resolvers that both observe the
/// title as absent both create it.
#[test]
fn test_concurrent_resolve_can_duplicate() {
    let memory = MemoryBackend::new();
    let id = memory.create_spreadsheet("S");
    let racing = ListThenWait {
        inner: &memory,
        barrier: Barrier::new(2),
    };
    let client = SheetsClient::new(&racing);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    let ss = client.open("S").unwrap();
                    ss.worksheet_or_create("race").unwrap().id()
                })
            })
            .collect();
        let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_ne!(ids[0], ids[1]);
    });

    let titles: Vec<String> = memory
        .list_worksheets(&id)
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .filter(|t| t == "race")
        .collect();
    assert_eq!(titles.len(), 2);
}
