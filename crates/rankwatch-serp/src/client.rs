//! HTTP client for the SERP API's Google organic task endpoints.
//!
//! Wraps `reqwest` with Basic auth, envelope status checking and typed
//! response deserialization. A non-success envelope `status_code` surfaces as
//! [`SerpError::Api`] so callers can decide whether to log and continue.

use std::time::Duration;

use rankwatch_core::TaskRequest;
use reqwest::{Client, RequestBuilder, Url};

use crate::credentials::SerpCredentials;
use crate::error::SerpError;
use crate::types::{
    ApiResponse, FinishedTask, KeywordResult, PostedTask, ReadyTask, STATUS_OK,
};

const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/";
const TASK_POST_PATH: &str = "v3/serp/google/organic/task_post";
const TASKS_READY_PATH: &str = "v3/serp/google/organic/tasks_ready";

/// Client for the SERP API.
///
/// Use [`SerpClient::new`] for production or [`SerpClient::with_base_url`] to
/// point at a mock server in tests.
pub struct SerpClient {
    client: Client,
    credentials: SerpCredentials,
    base_url: Url,
}

impl SerpClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: SerpCredentials, timeout_secs: u64) -> Result<Self, SerpError> {
        Self::with_base_url(credentials, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SerpError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        credentials: SerpCredentials,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SerpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankwatch/0.1 (rank-tracking)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last base segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SerpError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    /// Submits one batch of keyword tasks.
    ///
    /// Returns the per-task acknowledgements in submission order. Individual
    /// tasks may still carry a non-created status; see
    /// [`PostedTask::is_created`].
    ///
    /// # Errors
    ///
    /// - [`SerpError::Api`] if the provider rejects the whole batch.
    /// - [`SerpError::Http`] on network failure or non-2xx HTTP status.
    /// - [`SerpError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn post_tasks(&self, tasks: &[TaskRequest]) -> Result<Vec<PostedTask>, SerpError> {
        let url = self.endpoint_url(TASK_POST_PATH)?;
        let request = self.client.post(url).json(tasks);
        let body = self.request_json(request, TASK_POST_PATH).await?;
        Self::check_api_error(&body)?;

        let envelope: ApiResponse<PostedTask> =
            serde_json::from_value(body).map_err(|e| SerpError::Deserialize {
                context: format!("task_post({} tasks)", tasks.len()),
                source: e,
            })?;
        Ok(envelope.into_tasks())
    }

    /// Lists tasks whose results are ready to collect.
    ///
    /// # Errors
    ///
    /// - [`SerpError::Api`] if the provider reports a non-success status.
    /// - [`SerpError::Http`] on network failure or non-2xx HTTP status.
    /// - [`SerpError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn tasks_ready(&self) -> Result<Vec<ReadyTask>, SerpError> {
        let url = self.endpoint_url(TASKS_READY_PATH)?;
        let body = self
            .request_json(self.client.get(url), TASKS_READY_PATH)
            .await?;
        Self::check_api_error(&body)?;

        let envelope: ApiResponse<ReadyTask> =
            serde_json::from_value(body).map_err(|e| SerpError::Deserialize {
                context: "tasks_ready".to_owned(),
                source: e,
            })?;
        Ok(envelope.into_tasks())
    }

    /// Fetches a finished task through the follow-up path handed out by
    /// [`Self::tasks_ready`].
    ///
    /// Returns `Ok(None)` when the task carries no keyword, no result, or an
    /// empty item list.
    ///
    /// # Errors
    ///
    /// - [`SerpError::Api`] if the provider reports a non-success status.
    /// - [`SerpError::Http`] on network failure or non-2xx HTTP status.
    /// - [`SerpError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn task_result(&self, endpoint: &str) -> Result<Option<KeywordResult>, SerpError> {
        let url = self.endpoint_url(endpoint)?;
        let body = self.request_json(self.client.get(url), endpoint).await?;
        Self::check_api_error(&body)?;

        let envelope: ApiResponse<FinishedTask> =
            serde_json::from_value(body).map_err(|e| SerpError::Deserialize {
                context: format!("task_get({endpoint})"),
                source: e,
            })?;

        let Some(task) = envelope.into_tasks().into_iter().next() else {
            return Ok(None);
        };
        Ok(Self::keyword_result(task))
    }

    fn keyword_result(task: FinishedTask) -> Option<KeywordResult> {
        if task.status_code != STATUS_OK {
            tracing::debug!(
                task_id = %task.id,
                status_code = task.status_code,
                status_message = %task.status_message,
                "finished task carries a non-success status"
            );
            return None;
        }

        let mut results = task.result?.into_iter();
        let first = results.next()?;
        let keyword = task
            .data
            .and_then(|d| d.keyword)
            .or(first.keyword)?;
        let items = first.items.filter(|items| !items.is_empty())?;
        let entries = items
            .into_iter()
            .filter_map(crate::types::SerpItem::into_entry)
            .collect();

        Some(KeywordResult { keyword, entries })
    }

    /// Resolves an API path (with or without a leading slash) against the
    /// base URL.
    fn endpoint_url(&self, path: &str) -> Result<Url, SerpError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SerpError::InvalidUrl {
                url: path.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Sends an authenticated request, asserts a 2xx HTTP status, and parses
    /// the response body as JSON.
    async fn request_json(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<serde_json::Value, SerpError> {
        let response = request
            .basic_auth(&self.credentials.login, Some(&self.credentials.password))
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SerpError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Checks the envelope `status_code` and returns an error unless it is
    /// the success code.
    fn check_api_error(body: &serde_json::Value) -> Result<(), SerpError> {
        let code = body
            .get("status_code")
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u32::try_from(c).ok());
        if code == Some(STATUS_OK) {
            return Ok(());
        }
        let message = body
            .get("status_message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        Err(SerpError::Api {
            code: code.unwrap_or_default(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
