//! Login/password credentials for the SERP API, read from a local JSON file.

use std::path::Path;

use serde::Deserialize;

use crate::error::SerpError;

/// API login and password sent as HTTP Basic auth on every request.
///
/// The file shape is `{ "login": "...", "password": "..." }`.
#[derive(Clone, Deserialize)]
pub struct SerpCredentials {
    pub login: String,
    pub password: String,
}

impl SerpCredentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Reads credentials from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Credentials`] if the file cannot be read, is not
    /// valid JSON, or has an empty login or password.
    pub fn from_file(path: &Path) -> Result<Self, SerpError> {
        let credentials_error = |reason: String| SerpError::Credentials {
            path: path.to_path_buf(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| credentials_error(e.to_string()))?;
        let creds: Self =
            serde_json::from_str(&raw).map_err(|e| credentials_error(e.to_string()))?;

        if creds.login.trim().is_empty() || creds.password.is_empty() {
            return Err(credentials_error("login and password must not be empty".to_owned()));
        }
        Ok(creds)
    }
}

impl std::fmt::Debug for SerpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpCredentials")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .finish()
    }
}
