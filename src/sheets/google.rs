//! Google Sheets v4 REST backend.
//!
//! Reads use `spreadsheets.values.get` with formatted values, so cells arrive
//! exactly as displayed in the sheet (`"1.234,50 €"`). Appends use
//! `spreadsheets.values.append` with `USER_ENTERED` so the sheet applies its
//! own number parsing.
//!
//! Credentials, in order of preference: a service account key file (tokens are
//! minted and refreshed by [`ServiceAccountAuth`]), a fixed bearer token, or an
//! API key for read-only access.

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::auth::{ServiceAccountAuth, ServiceAccountKey};
use super::{Rows, SheetSource};
use crate::config::SheetsConfig;
use crate::errors::SheetError;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Rows,
}

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: [&'a [String]; 1],
}

enum Credentials {
    ServiceAccount(ServiceAccountAuth),
    Token(String),
    ApiKey(String),
    Missing,
}

/// Spreadsheet opened by identifier.
pub struct GoogleSheetsClient {
    spreadsheet_id: String,
    credentials: Credentials,
    timeout_seconds: u64,
    client: reqwest::Client,
}

impl GoogleSheetsClient {
    /// Fails when a configured service account key cannot be read or parsed.
    pub fn new(config: &SheetsConfig) -> Result<Self, SheetError> {
        let client = reqwest::Client::new();
        let timeout_seconds = config.timeout_seconds as u64;
        let credentials = match (&config.credentials_file, &config.access_token, &config.api_key) {
            (Some(path), _, _) => {
                let auth = ServiceAccountAuth::new(
                    ServiceAccountKey::from_file(path)?,
                    client.clone(),
                    timeout_seconds,
                )?;
                info!("Using service account {} from {}", auth.client_email(), path);
                Credentials::ServiceAccount(auth)
            }
            (None, Some(token), _) => Credentials::Token(token.clone()),
            (None, None, Some(key)) => Credentials::ApiKey(key.clone()),
            (None, None, None) => Credentials::Missing,
        };
        Ok(Self {
            spreadsheet_id: config.spreadsheet_id.clone(),
            credentials,
            timeout_seconds,
            client,
        })
    }

    /// Build the values URL for a worksheet, with an optional action suffix (`:append`).
    pub fn values_url(&self, range: &str, action: &str) -> String {
        let mut url = format!(
            "{}/{}/values/{}{}",
            API_BASE,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range),
            action
        );
        if let Credentials::ApiKey(key) = &self.credentials {
            let sep = if url.contains('?') { '&' } else { '?' };
            url.push(sep);
            url.push_str("key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, SheetError> {
        match &self.credentials {
            Credentials::ServiceAccount(auth) => Ok(request.bearer_auth(auth.access_token().await?)),
            Credentials::Token(token) => Ok(request.bearer_auth(token)),
            Credentials::ApiKey(_) => Ok(request),
            Credentials::Missing => Err(SheetError::Auth(
                "no service account, access token or API key configured".to_string(),
            )),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, SheetError> {
        let request = self.authorize(request).await?;
        let response = timeout(Duration::from_secs(self.timeout_seconds), request.send())
            .await
            .map_err(|_| SheetError::Timeout(self.timeout_seconds))?
            .map_err(|e| SheetError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => {
                if let Credentials::ServiceAccount(auth) = &self.credentials {
                    auth.invalidate().await;
                }
                Err(SheetError::Auth(format!("status {}", status)))
            }
            403 => Err(SheetError::Auth(format!("status {}", status))),
            code => Err(SheetError::Status { status: code, body }),
        }
    }
}

impl SheetSource for GoogleSheetsClient {
    async fn read_rows(&self, worksheet: &str) -> Result<Rows, SheetError> {
        let url = self.values_url(worksheet, "");
        debug!("Reading worksheet '{}'", worksheet);
        let response = match self.send(self.client.get(&url)).await {
            Err(SheetError::Status { status: 400, body }) if body.contains("Unable to parse range") => {
                warn!("Worksheet '{}' does not exist", worksheet);
                return Err(SheetError::NotFound(worksheet.to_string()));
            }
            other => other?,
        };
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetError::Decode(e.to_string()))?;
        debug!("Read {} rows from '{}'", range.values.len(), worksheet);
        Ok(range.values)
    }

    async fn append_row(&self, worksheet: &str, row: Vec<String>) -> Result<(), SheetError> {
        let range = format!("{}!A:Z", worksheet);
        let url = self.values_url(&range, ":append");
        let body = AppendBody { values: [row.as_slice()] };
        let request = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "USER_ENTERED"), ("insertDataOption", "INSERT_ROWS")])
            .json(&body);
        self.send(request).await?;
        debug!("Appended row to '{}'", worksheet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: "abc123".to_string(),
            ..SheetsConfig::default()
        }
    }

    #[test]
    fn values_url_encodes_worksheet() {
        let client = GoogleSheetsClient::new(&config()).unwrap();
        assert_eq!(
            client.values_url("Alle Items", ""),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Alle%20Items"
        );
        assert!(client
            .values_url("Preisvorschläge!A:Z", ":append")
            .ends_with("/values/Preisvorschl%C3%A4ge%21A%3AZ:append"));
    }

    #[test]
    fn api_key_used_without_token() {
        let mut cfg = config();
        cfg.api_key = Some("k".to_string());
        let client = GoogleSheetsClient::new(&cfg).unwrap();
        assert!(client.values_url("Items", "").ends_with("?key=k"));

        cfg.access_token = Some("t".to_string());
        let client = GoogleSheetsClient::new(&cfg).unwrap();
        assert!(!client.values_url("Items", "").contains("key="));
    }

    #[test]
    fn service_account_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, include_str!("../../tests/fixtures/service_account.json")).unwrap();

        let mut cfg = config();
        cfg.credentials_file = Some(path.to_str().unwrap().to_string());
        cfg.api_key = Some("k".to_string());
        let client = GoogleSheetsClient::new(&cfg).unwrap();
        assert!(matches!(client.credentials, Credentials::ServiceAccount(_)));
        assert!(!client.values_url("Items", "").contains("key="));
    }

    #[test]
    fn unreadable_key_file_fails_construction() {
        let mut cfg = config();
        cfg.credentials_file = Some("/nonexistent/credentials.json".to_string());
        assert!(matches!(GoogleSheetsClient::new(&cfg), Err(SheetError::Auth(_))));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_network() {
        let client = GoogleSheetsClient::new(&config()).unwrap();
        let err = client.read_rows("Alle Items").await.unwrap_err();
        assert!(matches!(err, SheetError::Auth(_)));
    }
}
