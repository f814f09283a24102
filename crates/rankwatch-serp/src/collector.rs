//! Completed-job collection: one ready-listing poll, then one follow-up
//! fetch per ready task, folded into a [`ResultIndex`].

use rankwatch_core::ResultIndex;

use crate::client::SerpClient;
use crate::error::SerpError;

/// Outcome of a collection poll.
#[derive(Debug, Default)]
pub struct Collection {
    pub index: ResultIndex,
    /// Ready descriptors that yielded no usable result (no follow-up path,
    /// failed task, empty item list, or a rejected follow-up fetch).
    pub skipped: usize,
    /// Keywords seen more than once; the last result list was kept.
    pub duplicates: usize,
}

impl SerpClient {
    /// Polls the ready listing once and fetches every ready task's result.
    ///
    /// Ready entries without a result summary, and follow-ups the provider
    /// rejects or returns empty, are skipped and counted in
    /// [`Collection::skipped`].
    ///
    /// # Errors
    ///
    /// - [`SerpError::Api`] if the ready listing itself is rejected. The
    ///   caller must treat this as a hard stop.
    /// - [`SerpError::Http`] or [`SerpError::Deserialize`] from the poll or
    ///   any follow-up fetch.
    pub async fn collect_ready_results(&self) -> Result<Collection, SerpError> {
        let ready = self.tasks_ready().await?;
        let mut collection = Collection::default();

        for task in ready {
            let refs = task.result.unwrap_or_default();
            if refs.is_empty() {
                tracing::debug!(task_id = %task.id, "ready task has no result summary; skipping");
                collection.skipped += 1;
                continue;
            }

            for task_ref in refs {
                let Some(endpoint) = task_ref.endpoint_regular.filter(|e| !e.is_empty()) else {
                    tracing::debug!(task_id = %task_ref.id, "ready task has no regular endpoint; skipping");
                    collection.skipped += 1;
                    continue;
                };

                let fetched = match self.task_result(&endpoint).await {
                    Ok(fetched) => fetched,
                    Err(SerpError::Api { code, message }) => {
                        tracing::warn!(
                            task_id = %task_ref.id,
                            status_code = code,
                            status_message = %message,
                            "task result fetch rejected; skipping"
                        );
                        None
                    }
                    Err(e) => return Err(e),
                };

                let Some(result) = fetched else {
                    collection.skipped += 1;
                    continue;
                };

                if collection.index.insert(result.keyword.clone(), result.entries) {
                    tracing::debug!(keyword = %result.keyword, "keyword collected twice; keeping latest results");
                    collection.duplicates += 1;
                }
            }
        }

        tracing::info!(
            keywords = collection.index.len(),
            skipped = collection.skipped,
            "collected ready SERP results"
        );
        Ok(collection)
    }
}
