use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the Drive/Sheets client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A Google API answered with a non-2xx status.
    #[error("Google API error {status} for {context}: {message}")]
    Api {
        status: u16,
        context: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The credentials file is missing, unreadable or of an unsupported type.
    #[error("Google credentials at {}: {reason}", path.display())]
    Credentials { path: PathBuf, reason: String },

    /// The OAuth token endpoint refused to issue an access token.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("could not sign service-account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("invalid Google API URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no target data found in {spreadsheet_id} range {range}")]
    NoTargetData {
        spreadsheet_id: String,
        range: String,
    },

    #[error("sheet \"{title}\" not found in spreadsheet {spreadsheet_id}")]
    SheetNotFound {
        spreadsheet_id: String,
        title: String,
    },

    #[error("pagination limit reached listing folder {folder_id}: exceeded {max_pages} pages")]
    PaginationLimit { folder_id: String, max_pages: usize },
}
