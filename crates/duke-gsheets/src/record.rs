//! Header-keyed rows.

use std::io::Read;

use gsheets_protocol::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One logical row: column header → value, in insertion order.
///
/// The first record of a write defines the header row, so key order matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Header row derived from this record's keys.
    pub fn headers(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Cells for `headers`, in order. Missing keys become empty strings and
    /// keys outside `headers` are left out.
    pub fn to_row(&self, headers: &[String]) -> Vec<CellValue> {
        headers
            .iter()
            .map(|h| self.fields.get(h).cloned().unwrap_or_default())
            .collect()
    }

    /// Zip a data row against a header row.
    ///
    /// Short rows are padded with `""`, cells past the last header are
    /// dropped. A repeated header keeps its first position and takes the
    /// value of its last column.
    pub fn from_row(headers: &[String], row: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let cell = row.get(i).cloned().unwrap_or_default();
                (h.clone(), CellValue::String(cell))
            })
            .collect();
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl std::fmt::Display for Record {
    /// `{"Name": "Alice", "Age": 30}`: strings quoted, other scalars bare.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key:?}: ")?;
            match value {
                CellValue::String(s) => write!(f, "{s:?}")?,
                CellValue::Null => write!(f, "null")?,
                other => write!(f, "{other}")?,
            }
        }
        write!(f, "}}")
    }
}

/// Parse records from CSV text whose first line is the header row.
///
/// Every field is kept as a string. Ragged rows are accepted and aligned the
/// same way as rows read from a worksheet.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let row: Vec<String> = row.iter().map(str::to_string).collect();
        records.push(Record::from_row(&headers, &row));
    }
    Ok(records)
}

/// Parse records from a JSON array of objects, keeping each object's key order.
pub fn records_from_json<R: Read>(reader: R) -> Result<Vec<Record>> {
    Ok(serde_json::from_reader(reader)?)
}
