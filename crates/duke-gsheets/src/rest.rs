//! Blocking HTTP backend for the Google Sheets v4 and Drive v3 APIs.

use gsheets_protocol::{
    spreadsheet_name_query, AppendValues, AppendValuesResponse, BatchUpdateRequest,
    BatchUpdateResponse, CellValue, ErrorResponse, FileList, SheetProperties,
    SpreadsheetMetadata, UpdateValues, UpdateValuesResponse, ValueRange,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::backend::SheetsBackend;
use crate::config::SheetsConfig;
use crate::credentials::ServiceAccount;
use crate::error::{Result, SheetsError};

/// Authenticated session against the Google APIs.
///
/// The bearer token is fetched once in [`RestBackend::connect`] and never
/// refreshed; a session is meant to live for one read or write call.
pub struct RestBackend {
    http: Client,
    token: String,
    sheets_endpoint: Url,
    drive_endpoint: Url,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("sheets_endpoint", &self.sheets_endpoint.as_str())
            .field("drive_endpoint", &self.drive_endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl RestBackend {
    /// Load the service-account key named in `config` and exchange it for
    /// an access token.
    pub fn connect(config: &SheetsConfig) -> Result<Self> {
        let account = ServiceAccount::from_file(&config.credentials_path)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let token = account.fetch_access_token(&http, &config.scope_string())?;
        tracing::info!(
            email = %account.client_email,
            expires_in = token.expires_in,
            "authenticated service account"
        );

        Self::with_token(http, token.access_token, config)
    }

    /// Use an already-issued bearer token.
    pub fn with_token(http: Client, token: String, config: &SheetsConfig) -> Result<Self> {
        Ok(Self {
            http,
            token,
            sheets_endpoint: parse_endpoint(&config.sheets_endpoint)?,
            drive_endpoint: parse_endpoint(&config.drive_endpoint)?,
        })
    }

    fn sheets_url(&self, segments: &[&str]) -> Result<Url> {
        join_segments(&self.sheets_endpoint, segments)
    }

    fn drive_url(&self, segments: &[&str]) -> Result<Url> {
        join_segments(&self.drive_endpoint, segments)
    }

    /// Send an authorized request and decode a JSON reply.
    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.bearer_auth(&self.token).send()?;
        let status = resp.status();
        tracing::debug!(url = %resp.url(), %status, "sheets api response");

        if status.is_success() {
            return Ok(resp.json()?);
        }

        let body = resp.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(SheetsError::Authentication(message));
        }
        Err(SheetsError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| SheetsError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(SheetsError::Config(format!(
            "endpoint '{endpoint}' cannot be a base url"
        )));
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SheetsError::Config(format!("endpoint '{base}' cannot be a base url")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl SheetsBackend for RestBackend {
    fn find_spreadsheet(&self, name: &str) -> Result<String> {
        let url = self.drive_url(&["files"])?;
        let query = spreadsheet_name_query(name);
        let list: FileList = self.execute(self.http.get(url).query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]))?;

        if list.files.len() > 1 {
            tracing::debug!(
                name,
                matches = list.files.len(),
                "several spreadsheets share a name, using the first"
            );
        }
        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let url = self.sheets_url(&["spreadsheets", spreadsheet_id])?;
        let meta: SpreadsheetMetadata = self.execute(
            self.http
                .get(url)
                .query(&[("fields", "sheets.properties")]),
        )?;

        let mut sheets: Vec<SheetProperties> =
            meta.sheets.into_iter().map(|s| s.properties).collect();
        sheets.sort_by_key(|p| p.index);
        Ok(sheets)
    }

    fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<SheetProperties> {
        let target = format!("{spreadsheet_id}:batchUpdate");
        let url = self.sheets_url(&["spreadsheets", &target])?;
        let body = BatchUpdateRequest::add_sheet(title, rows, cols);
        let resp: BatchUpdateResponse = self.execute(self.http.post(url).json(&body))?;

        resp.replies
            .into_iter()
            .find_map(|reply| reply.add_sheet)
            .map(|added| added.properties)
            .ok_or_else(|| {
                SheetsError::UnexpectedResponse("batchUpdate returned no addSheet reply".into())
            })
    }

    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.sheets_url(&["spreadsheets", spreadsheet_id, "values", range])?;
        let values: ValueRange = self.execute(self.http.get(url))?;
        Ok(values.into_text_rows())
    }

    fn append_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        let target = format!("{range}:append");
        let url = self.sheets_url(&["spreadsheets", spreadsheet_id, "values", &target])?;
        let body = AppendValues::single_row(row.to_vec());
        let resp: AppendValuesResponse = self.execute(
            self.http
                .post(url)
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
        )?;

        if let Some(updates) = resp.updates {
            tracing::debug!(
                range = %updates.updated_range,
                cells = updates.updated_cells,
                "appended row"
            );
        }
        Ok(())
    }

    fn update_row(&self, spreadsheet_id: &str, range: &str, row: &[CellValue]) -> Result<()> {
        let url = self.sheets_url(&["spreadsheets", spreadsheet_id, "values", range])?;
        let body = UpdateValues::single_row(range, row.to_vec());
        let resp: UpdateValuesResponse = self.execute(
            self.http
                .put(url)
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
        )?;

        tracing::debug!(
            range = %resp.updated_range,
            cells = resp.updated_cells,
            "updated row"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::with_token(Client::new(), "token".into(), &SheetsConfig::default()).unwrap()
    }

    #[test]
    fn test_sheets_url() {
        let url = backend()
            .sheets_url(&["spreadsheets", "abc", "values", "'tab 1'!1:1"])
            .unwrap();
        assert!(url
            .as_str()
            .starts_with("https://sheets.googleapis.com/v4/spreadsheets/abc/values/"));
        assert!(url.as_str().contains("tab%201"));
    }

    #[test]
    fn test_batch_update_target() {
        let url = backend()
            .sheets_url(&["spreadsheets", "abc:batchUpdate"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc:batchUpdate"
        );
    }

    #[test]
    fn test_trailing_slash_endpoint() {
        let config = SheetsConfig {
            drive_endpoint: "http://localhost:8080/drive/v3/".to_string(),
            ..Default::default()
        };
        let backend = RestBackend::with_token(Client::new(), "t".into(), &config).unwrap();
        assert_eq!(
            backend.drive_url(&["files"]).unwrap().as_str(),
            "http://localhost:8080/drive/v3/files"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = SheetsConfig {
            sheets_endpoint: "not a url".to_string(),
            ..Default::default()
        };
        let err = RestBackend::with_token(Client::new(), "t".into(), &config).unwrap_err();
        assert!(matches!(err, SheetsError::Config(_)), "{err}");
    }

    #[test]
    fn test_connect_without_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SheetsConfig::new(dir.path().join("credentials.json"), "anything");
        let err = RestBackend::connect(&config).unwrap_err();
        assert!(matches!(err, SheetsError::Authentication(_)), "{err}");
    }
}
