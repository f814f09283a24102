//! SERP API response types.
//!
//! Every response is wrapped in an envelope carrying a numeric `status_code`
//! (`20000` on success) and a `tasks` array. Each task carries its own
//! `status_code` as well: `20100` when a task was created, `20000` when a
//! finished task's result is returned.
//!
//! `tasks`, `result` and `items` are `null` rather than absent when empty,
//! so they are all modelled as `Option<Vec<_>>`.

use rankwatch_core::SerpEntry;
use serde::Deserialize;

/// Envelope-level success code.
pub const STATUS_OK: u32 = 20_000;
/// Per-task code for a newly created task.
pub const STATUS_TASK_CREATED: u32 = 20_100;

/// Top-level envelope for all SERP API responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub status_code: u32,
    #[serde(default)]
    pub status_message: String,
    pub tasks: Option<Vec<T>>,
}

impl<T> ApiResponse<T> {
    pub fn into_tasks(self) -> Vec<T> {
        self.tasks.unwrap_or_default()
    }
}

/// Echo of the submitted parameters, present on every task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskData {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub location_code: Option<u32>,
}

// ---------------------------------------------------------------------------
// task_post
// ---------------------------------------------------------------------------

/// One task acknowledged by `task_post`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostedTask {
    pub id: String,
    pub status_code: u32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub data: Option<TaskData>,
}

impl PostedTask {
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.status_code == STATUS_TASK_CREATED
    }

    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.keyword.as_deref())
    }
}

// ---------------------------------------------------------------------------
// tasks_ready
// ---------------------------------------------------------------------------

/// A ready-listing entry. Its `result` holds follow-up references, not SERP
/// items.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyTask {
    pub id: String,
    pub status_code: u32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub result: Option<Vec<ReadyTaskRef>>,
}

/// Follow-up reference for one completed task.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyTaskRef {
    pub id: String,
    #[serde(default)]
    pub date_posted: Option<String>,
    /// Path of the regular-mode `task_get` endpoint for this task.
    #[serde(default)]
    pub endpoint_regular: Option<String>,
}

// ---------------------------------------------------------------------------
// task_get/regular
// ---------------------------------------------------------------------------

/// One task returned by `task_get/regular`.
#[derive(Debug, Deserialize)]
pub struct FinishedTask {
    pub id: String,
    pub status_code: u32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub data: Option<TaskData>,
    #[serde(default)]
    pub result: Option<Vec<SerpResult>>,
}

/// SERP for one keyword.
#[derive(Debug, Deserialize)]
pub struct SerpResult {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<SerpItem>>,
}

/// One item on the results page. Non-organic item types may lack a URL or
/// domain.
#[derive(Debug, Deserialize)]
pub struct SerpItem {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub rank_group: Option<u32>,
    #[serde(default)]
    pub rank_absolute: Option<u32>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SerpItem {
    /// Converts to a [`SerpEntry`]; items without an absolute rank are dropped.
    #[must_use]
    pub fn into_entry(self) -> Option<SerpEntry> {
        Some(SerpEntry {
            rank_absolute: self.rank_absolute?,
            url: self.url.unwrap_or_default(),
            domain: self.domain.unwrap_or_default(),
        })
    }
}

/// Keyword and ordered SERP entries extracted from a finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordResult {
    pub keyword: String,
    pub entries: Vec<SerpEntry>,
}
