//! Connection configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Read/write access to spreadsheet contents.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Read/write access to Drive, needed to look spreadsheets up by name.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Environment variable holding the service-account key path.
pub const CREDENTIALS_ENV: &str = "GSHEETS_CREDENTIALS";

/// Environment variable holding the target spreadsheet's display name.
pub const SPREADSHEET_ENV: &str = "GSHEETS_SPREADSHEET";

/// Configuration for a Sheets session.
///
/// Passed explicitly to every entry point; nothing is read from process-wide
/// state except through [`SheetsConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Path to the service-account JSON key. Default: `credentials.json`.
    pub credentials_path: PathBuf,
    /// Display name of the spreadsheet to open.
    pub spreadsheet_name: String,
    /// OAuth scopes requested for the access token.
    pub scopes: Vec<String>,
    /// Base URL of the Sheets v4 API. Default: `https://sheets.googleapis.com/v4`.
    pub sheets_endpoint: String,
    /// Base URL of the Drive v3 API. Default: `https://www.googleapis.com/drive/v3`.
    pub drive_endpoint: String,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credentials.json"),
            spreadsheet_name: String::new(),
            scopes: vec![SPREADSHEETS_SCOPE.to_string(), DRIVE_SCOPE.to_string()],
            sheets_endpoint: "https://sheets.googleapis.com/v4".to_string(),
            drive_endpoint: "https://www.googleapis.com/drive/v3".to_string(),
            timeout: None,
        }
    }
}

impl SheetsConfig {
    pub fn new(credentials_path: impl Into<PathBuf>, spreadsheet_name: impl Into<String>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            spreadsheet_name: spreadsheet_name.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `GSHEETS_CREDENTIALS` and `GSHEETS_SPREADSHEET`
    /// when they are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(CREDENTIALS_ENV) {
            config.credentials_path = PathBuf::from(path);
        }
        if let Some(name) = lookup(SPREADSHEET_ENV) {
            config.spreadsheet_name = name;
        }
        config
    }

    /// Scopes joined the way the token endpoint expects them.
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SheetsConfig::default();
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(
            config.scope_string(),
            "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive"
        );
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_from_lookup() {
        let config = SheetsConfig::from_lookup(|key| match key {
            CREDENTIALS_ENV => Some("/etc/keys/sa.json".to_string()),
            SPREADSHEET_ENV => Some("sample_people_data".to_string()),
            _ => None,
        });
        assert_eq!(config.credentials_path, PathBuf::from("/etc/keys/sa.json"));
        assert_eq!(config.spreadsheet_name, "sample_people_data");
    }

    #[test]
    fn test_from_lookup_unset() {
        let config = SheetsConfig::from_lookup(|_| None);
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert!(config.spreadsheet_name.is_empty());
    }
}
