use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the SERP API client.
#[derive(Debug, Error)]
pub enum SerpError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API envelope carried a non-success `status_code`.
    #[error("SERP API error {code}: {message}")]
    Api { code: u32, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The credentials file is missing, unreadable or incomplete.
    #[error("SERP credentials at {}: {reason}", path.display())]
    Credentials { path: PathBuf, reason: String },

    #[error("invalid SERP API URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
