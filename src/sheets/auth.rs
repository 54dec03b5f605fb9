//! Service account login for the Sheets API.
//!
//! The key file downloaded from the cloud console signs a short-lived JWT, which
//! is exchanged at the key's `token_uri` for a bearer token. Tokens are cached and
//! minted again shortly before they expire.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::errors::SheetError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Longest assertion lifetime the token endpoint accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens closer than this to expiry are replaced before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a service account key file the login needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, SheetError> {
        serde_json::from_str(json)
            .map_err(|e| SheetError::Auth(format!("invalid service account key: {}", e)))
    }

    pub fn from_file(path: &str) -> Result<Self, SheetError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SheetError::Auth(format!("cannot read credentials file {}: {}", path, e)))?;
        Self::from_json(&json)
    }

    fn claims(&self, issued_at: i64) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    /// Unix seconds
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - REFRESH_MARGIN_SECS > now
    }
}

/// Mints and caches bearer tokens for one service account.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    client: reqwest::Client,
    timeout_seconds: u64,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(
        key: ServiceAccountKey,
        client: reqwest::Client,
        timeout_seconds: u64,
    ) -> Result<Self, SheetError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            SheetError::Auth(format!("invalid private key for {}: {}", key.client_email, e))
        })?;
        Ok(Self {
            key,
            signing_key,
            client,
            timeout_seconds,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Bearer token for the spreadsheet scope, minted on first use and before expiry.
    pub async fn access_token(&self) -> Result<String, SheetError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }
        let token = self.mint(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drop the cached token, e.g. after the API rejected it.
    pub async fn invalidate(&self) {
        if self.cached.lock().await.take().is_some() {
            warn!("Discarding rejected access token for {}", self.key.client_email);
        }
    }

    async fn mint(&self, now: i64) -> Result<CachedToken, SheetError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let assertion = jsonwebtoken::encode(&header, &self.key.claims(now), &self.signing_key)
            .map_err(|e| SheetError::Auth(format!("failed to sign token request: {}", e)))?;

        debug!("Requesting access token for {}", self.key.client_email);
        let request = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send();
        let response = timeout(Duration::from_secs(self.timeout_seconds), request)
            .await
            .map_err(|_| SheetError::Timeout(self.timeout_seconds))?
            .map_err(|e| SheetError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Auth(format!(
                "token exchange returned status {}: {}",
                status, body
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SheetError::Decode(e.to_string()))?;
        info!(
            "Obtained access token for {}, valid for {}s",
            self.key.client_email, token.expires_in
        );
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../tests/fixtures/service_account.json");

    #[test]
    fn key_file_fields() {
        let key = ServiceAccountKey::from_json(FIXTURE).unwrap();
        assert_eq!(key.client_email, "pricebot@pricebot-test.iam.gserviceaccount.com");
        assert_eq!(key.private_key_id.as_deref(), Some("0123456789abcdef"));
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn token_uri_defaults_when_absent() {
        let key = ServiceAccountKey::from_json(r#"{"client_email": "a@b", "private_key": "x"}"#).unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        assert!(ServiceAccountKey::from_json(r#"{"client_email": "a@b"}"#).is_err());
    }

    #[test]
    fn claims_cover_one_hour_for_sheets_scope() {
        let key = ServiceAccountKey::from_json(FIXTURE).unwrap();
        let claims = key.claims(1_700_000_000);
        assert_eq!(claims.iss, key.client_email);
        assert_eq!(claims.aud, DEFAULT_TOKEN_URI);
        assert_eq!(claims.scope, SHEETS_SCOPE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_refresh_a_minute_early() {
        let token = CachedToken { value: "t".into(), expires_at: 1000 };
        assert!(token.is_fresh(900));
        assert!(!token.is_fresh(940));
        assert!(!token.is_fresh(1000));
    }

    #[test]
    fn malformed_private_key_is_auth_error() {
        let key = ServiceAccountKey::from_json(r#"{"client_email": "a@b", "private_key": "nope"}"#).unwrap();
        let err = ServiceAccountAuth::new(key, reqwest::Client::new(), 10).err().unwrap();
        assert!(matches!(err, SheetError::Auth(_)));
    }

    #[test]
    fn missing_key_file_is_auth_error() {
        let err = ServiceAccountKey::from_file("/nonexistent/credentials.json").unwrap_err();
        assert!(matches!(err, SheetError::Auth(_)));
    }
}
