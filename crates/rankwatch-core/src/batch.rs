//! Splits targets into SERP task-submission batches.
//!
//! The provider accepts at most 100 tasks per submission. A batch is flushed
//! when it holds `max_size` tasks or when the final target has been added.

use serde::Serialize;

use crate::model::Target;

/// Provider hard limit on tasks per submission call.
pub const PROVIDER_MAX_BATCH: usize = 100;

/// Fixed search locale applied to every submitted keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub language_code: String,
    pub location_code: u32,
}

/// One keyword submission in a task batch, serialized as the provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRequest {
    pub language_code: String,
    pub location_code: u32,
    pub keyword: String,
}

/// Builds the ordered list of task batches for `targets`.
///
/// Blank-keyword placeholder rows are not submitted. `max_size` is clamped to
/// `1..=PROVIDER_MAX_BATCH`.
#[must_use]
pub fn plan_batches(targets: &[Target], locale: &Locale, max_size: usize) -> Vec<Vec<TaskRequest>> {
    let max_size = max_size.clamp(1, PROVIDER_MAX_BATCH);
    let requests: Vec<TaskRequest> = targets
        .iter()
        .filter(|t| t.is_trackable())
        .map(|t| TaskRequest {
            language_code: locale.language_code.clone(),
            location_code: locale.location_code,
            keyword: t.keyword.clone(),
        })
        .collect();

    requests.chunks(max_size).map(<[TaskRequest]>::to_vec).collect()
}
