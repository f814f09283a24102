//! HTTP client for Google Drive v3 and Sheets v4.
//!
//! Every request carries a bearer token from the [`Authenticator`]. Non-2xx
//! responses surface as [`SheetsError::Api`] with the message Google puts in
//! its `{"error": {...}}` body.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::auth::Authenticator;
use crate::error::SheetsError;
use crate::types::{BatchUpdateResponse, DriveFile, DriveFileList, Spreadsheet, ValueRange};

const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3/";
const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Safety ceiling for folder listing.
const MAX_PAGES: usize = 100;

/// Client for the Drive and Sheets APIs.
///
/// Use [`SheetsClient::new`] for production or [`SheetsClient::with_base_urls`]
/// to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    auth: Authenticator,
    drive_base: Url,
    sheets_base: Url,
}

impl SheetsClient {
    /// Creates a client pointed at the production Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(auth: Authenticator, timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_urls(
            auth,
            timeout_secs,
            DEFAULT_DRIVE_BASE_URL,
            DEFAULT_SHEETS_BASE_URL,
        )
    }

    /// Creates a client with custom Drive and Sheets base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SheetsError::InvalidUrl`] if either base URL is invalid.
    pub fn with_base_urls(
        auth: Authenticator,
        timeout_secs: u64,
        drive_base: &str,
        sheets_base: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankwatch/0.1 (rank-tracking)")
            .build()?;

        Ok(Self {
            client,
            auth,
            drive_base: parse_base(drive_base)?,
            sheets_base: parse_base(sheets_base)?,
        })
    }

    /// Fetches one page of spreadsheets whose parent is `folder_id`.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Api`] on a non-2xx response.
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::Deserialize`] if the body does not match the expected shape.
    pub async fn list_spreadsheets_page(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> Result<DriveFileList, SheetsError> {
        let mut url = join_segments(&self.drive_base, &["files"])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair(
                    "q",
                    &format!("mimeType='{SPREADSHEET_MIME_TYPE}' and '{folder_id}' in parents"),
                )
                .append_pair("spaces", "drive")
                .append_pair("fields", "nextPageToken, files(id, name)")
                .append_pair("supportsAllDrives", "true")
                .append_pair("includeItemsFromAllDrives", "true");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        self.send_json(self.client.get(url), "drive files.list").await
    }

    /// Lists every spreadsheet in `folder_id`, following page tokens until
    /// the API stops returning one.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::list_spreadsheets_page`].
    /// Returns [`SheetsError::PaginationLimit`] if the listing exceeds
    /// [`MAX_PAGES`] pages.
    pub async fn list_spreadsheets(&self, folder_id: &str) -> Result<Vec<DriveFile>, SheetsError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(SheetsError::PaginationLimit {
                    folder_id: folder_id.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let page = self
                .list_spreadsheets_page(folder_id, page_token.as_deref())
                .await?;
            files.extend(page.files);

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!(folder_id, count = files.len(), pages = page_count, "listed spreadsheets");
        Ok(files)
    }

    /// Fetches tab metadata (`sheets.properties`) for a spreadsheet.
    ///
    /// # Errors
    ///
    /// See [`Self::list_spreadsheets_page`].
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, SheetsError> {
        let mut url = join_segments(&self.sheets_base, &["spreadsheets", spreadsheet_id])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties");
        self.send_json(
            self.client.get(url),
            &format!("spreadsheets.get({spreadsheet_id})"),
        )
        .await
    }

    /// Reads an A1 range.
    ///
    /// # Errors
    ///
    /// See [`Self::list_spreadsheets_page`].
    pub async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<ValueRange, SheetsError> {
        let url = join_segments(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        self.send_json(
            self.client.get(url),
            &format!("values.get({spreadsheet_id}, {range})"),
        )
        .await
    }

    /// Applies a list of `batchUpdate` requests atomically.
    ///
    /// # Errors
    ///
    /// See [`Self::list_spreadsheets_page`].
    pub async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<BatchUpdateResponse, SheetsError> {
        let url = join_segments(
            &self.sheets_base,
            &["spreadsheets", &format!("{spreadsheet_id}:batchUpdate")],
        )?;
        let body = json!({ "requests": requests });
        self.send_json(
            self.client.post(url).json(&body),
            &format!("batchUpdate({spreadsheet_id})"),
        )
        .await
    }

    /// Overwrites an A1 range with raw (unparsed) values.
    ///
    /// # Errors
    ///
    /// See [`Self::list_spreadsheets_page`].
    pub async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<(), SheetsError> {
        let mut url = join_segments(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRange {
            range: Some(range.to_owned()),
            major_dimension: Some("ROWS".to_owned()),
            values: Some(values),
        };
        let _: Value = self
            .send_json(
                self.client.put(url).json(&body),
                &format!("values.update({spreadsheet_id}, {range})"),
            )
            .await?;
        Ok(())
    }

    /// Sends an authorised request, maps non-2xx statuses to
    /// [`SheetsError::Api`], and deserializes the body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, SheetsError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                context: context.to_owned(),
                message: google_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

fn parse_base(base_url: &str) -> Result<Url, SheetsError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| SheetsError::InvalidUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SheetsError::InvalidUrl {
            url: base_url.to_owned(),
            reason: "URL cannot be a base".to_owned(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, SheetsError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SheetsError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Extracts `error.message` from a Google error body, falling back to the raw
/// body text.
fn google_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
