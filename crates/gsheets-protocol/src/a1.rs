//! A1-notation range strings for worksheet titles.

/// Quote a worksheet title for use in a range, doubling embedded quotes.
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// The whole used area of a worksheet.
pub fn sheet_range(title: &str) -> String {
    quote_title(title)
}

/// Row `row` (1-based) of a worksheet.
pub fn row_range(title: &str, row: u32) -> String {
    format!("{}!{row}:{row}", quote_title(title))
}

/// The full grid of a worksheet, e.g. `A1:T100` for 100 rows by 20 columns.
///
/// Returns `None` for a grid with no rows or no columns.
pub fn grid_extent(rows: u32, cols: u32) -> Option<String> {
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(format!("A1:{}{rows}", column_letters(cols - 1)))
}

/// Convert a 0-based column index to its letter form (`0` → `A`, `26` → `AA`).
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
