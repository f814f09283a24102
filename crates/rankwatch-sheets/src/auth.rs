//! OAuth access tokens for the Drive and Sheets APIs.
//!
//! Two credential file types are accepted, distinguished by their `"type"`
//! field:
//!
//! - `service_account`: a key file with an RSA private key. An RS256-signed
//!   JWT assertion is exchanged at the key's `token_uri`.
//! - `authorized_user`: a refresh token cached from an earlier interactive
//!   consent. It is exchanged at the OAuth token endpoint.
//!
//! Access tokens are cached until one minute before they expire.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::SheetsError;

/// Scopes requested for every token: spreadsheet read/write and Drive listing.
pub const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// Contents of a Google credentials JSON file.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoogleCredentials {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl GoogleCredentials {
    /// Reads and parses a credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Credentials`] if the file cannot be read or is
    /// not a supported credential type.
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let raw = std::fs::read_to_string(path).map_err(|e| SheetsError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| SheetsError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            GoogleCredentials::ServiceAccount(_) => "service_account",
            GoogleCredentials::AuthorizedUser(_) => "authorized_user",
        }
    }
}

impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("GoogleCredentials");
        s.field("type", &self.kind());
        if let GoogleCredentials::ServiceAccount(key) = self {
            s.field("client_email", &key.client_email);
        }
        s.field("secret", &"[redacted]").finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

enum TokenSource {
    Static(String),
    Credentials(GoogleCredentials),
}

/// Hands out bearer tokens for Google API requests.
pub struct Authenticator {
    source: TokenSource,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl Authenticator {
    /// Builds an authenticator that exchanges `credentials` for tokens.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the HTTP client cannot be built.
    pub fn from_credentials(
        credentials: GoogleCredentials,
        timeout_secs: u64,
    ) -> Result<Self, SheetsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            source: TokenSource::Credentials(credentials),
            http,
            cached: Mutex::new(None),
        })
    }

    /// Reads `path` and builds an authenticator from it.
    ///
    /// # Errors
    ///
    /// See [`GoogleCredentials::from_file`] and [`Self::from_credentials`].
    pub fn from_file(path: &Path, timeout_secs: u64) -> Result<Self, SheetsError> {
        let credentials = GoogleCredentials::from_file(path)?;
        tracing::debug!(path = %path.display(), kind = credentials.kind(), "loaded Google credentials");
        Self::from_credentials(credentials, timeout_secs)
    }

    /// An authenticator that always returns `token`. Used against mock servers.
    #[must_use]
    pub fn with_static_token(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
            http: Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid access token, exchanging credentials when the cached
    /// token is missing or about to expire.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Jwt`] if the service-account key cannot sign.
    /// - [`SheetsError::TokenExchange`] if the token endpoint refuses.
    /// - [`SheetsError::Http`] on network failure.
    pub async fn access_token(&self) -> Result<String, SheetsError> {
        let credentials = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Credentials(credentials) => credentials,
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let fresh = match credentials {
            GoogleCredentials::ServiceAccount(key) => {
                let assertion = sign_assertion(key, Utc::now())?;
                self.exchange(
                    &key.token_uri,
                    &[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)],
                )
                .await?
            }
            GoogleCredentials::AuthorizedUser(user) => {
                self.exchange(
                    &user.token_uri,
                    &[
                        ("grant_type", "refresh_token"),
                        ("client_id", &user.client_id),
                        ("client_secret", &user.client_secret),
                        ("refresh_token", &user.refresh_token),
                    ],
                )
                .await?
            }
        };

        tracing::debug!(expires_at = %fresh.expires_at, "obtained Google access token");
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn exchange(
        &self,
        token_uri: &str,
        form: &[(&str, &str)],
    ) -> Result<CachedToken, SheetsError> {
        let response = self.http.post(token_uri).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SheetsError::TokenExchange(format!(
                "status {status}: {}",
                oauth_error_message(&body)
            )));
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: "OAuth token response".to_owned(),
                source: e,
            })?;

        let lifetime = parsed
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS)
            .clamp(0, 86_400);
        Ok(CachedToken {
            value: parsed.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
        })
    }
}

/// Signs the JWT-bearer assertion for a service account.
fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, SheetsError> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid.clone_from(&key.private_key_id);

    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

/// Pulls `error_description` (or `error`) out of an OAuth error body.
fn oauth_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("error"))
                .and_then(serde_json::Value::as_str)
        })
        .map_or_else(|| body.trim().to_owned(), str::to_owned)
}
