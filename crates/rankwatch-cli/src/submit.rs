//! Submission phase: spreadsheets → targets → batches → SERP tasks.
//!
//! Targets from all spreadsheets are batched together. A rejected batch is
//! logged with the provider's code and message and the remaining batches
//! are still submitted. Missing target data, credential
//! problems and transport failures stop the run.

use std::fmt;
use std::path::Path;

use rankwatch_core::{plan_batches, AppConfig, Target};
use rankwatch_serp::{SerpClient, SerpError};
use rankwatch_sheets::{SheetsClient, YearSheet};

use crate::snapshot::Snapshot;

/// Totals for one submission run.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SubmitReport {
    pub spreadsheets: usize,
    pub targets: usize,
    pub batches: usize,
    pub tasks_created: usize,
    pub batches_rejected: usize,
    pub tasks_rejected: usize,
    pub dry_run: bool,
}

impl SubmitReport {
    /// Provider rejections seen during the run.
    pub(crate) fn diagnostics(&self) -> usize {
        self.batches_rejected + self.tasks_rejected
    }
}

impl fmt::Display for SubmitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            return write!(
                f,
                "dry-run: would submit {} targets from {} spreadsheets in {} batches",
                self.targets, self.spreadsheets, self.batches
            );
        }
        write!(
            f,
            "submitted {} batches ({} tasks created) for {} targets from {} spreadsheets; \
             {} batches and {} tasks rejected",
            self.batches,
            self.tasks_created,
            self.targets,
            self.spreadsheets,
            self.batches_rejected,
            self.tasks_rejected
        )
    }
}

/// Reads every spreadsheet in the target folder, then submits all of their
/// targets as one ordered sequence.
///
/// Nothing is submitted until every spreadsheet has been read, so a sheet
/// without target data stops the run before any task is posted. Batches
/// are cut from the combined sequence and may span spreadsheets.
///
/// With `serp` set to `None` (dry run) the batches are planned and logged
/// but nothing is sent and no sheet is modified. With `snapshot` set, the
/// targets read are also written to that file after a real submission.
///
/// # Errors
///
/// Returns an error on listing, rollover or read failures, on a sheet
/// without target data, and on SERP transport failures.
pub(crate) async fn run_submit(
    config: &AppConfig,
    sheets: &SheetsClient,
    serp: Option<&SerpClient>,
    snapshot_path: Option<&Path>,
) -> anyhow::Result<SubmitReport> {
    let files = sheets.list_spreadsheets(&config.target_folder_id).await?;
    tracing::info!(
        folder_id = %config.target_folder_id,
        spreadsheets = files.len(),
        "found target spreadsheets"
    );

    let mut report = SubmitReport {
        dry_run: serp.is_none(),
        ..SubmitReport::default()
    };
    let mut snapshot = Snapshot::default();
    let mut all_targets: Vec<Target> = Vec::new();

    for file in &files {
        let targets = read_targets(config, sheets, &file.id, report.dry_run).await?;
        let trackable = targets.iter().filter(|t| t.is_trackable()).count();
        tracing::info!(
            spreadsheet_id = %file.id,
            name = %file.name,
            targets = trackable,
            "read targets"
        );

        report.spreadsheets += 1;
        report.targets += trackable;
        all_targets.extend(targets.iter().cloned());
        snapshot.push(&file.id, &file.name, targets);
        crate::pause(config).await;
    }

    let batches = plan_batches(&all_targets, &config.locale(), config.batch_max_size);
    for (n, batch) in batches.iter().enumerate() {
        let Some(serp) = serp else {
            tracing::info!(batch = n + 1, size = batch.len(), "dry-run batch");
            report.batches += 1;
            continue;
        };

        match serp.post_tasks(batch).await {
            Ok(posted) => {
                report.batches += 1;
                for task in posted {
                    if task.is_created() {
                        report.tasks_created += 1;
                    } else {
                        tracing::warn!(
                            keyword = task.keyword().unwrap_or_default(),
                            status_code = task.status_code,
                            status_message = %task.status_message,
                            "task not accepted"
                        );
                        report.tasks_rejected += 1;
                    }
                }
            }
            Err(SerpError::Api { code, message }) => {
                tracing::error!(
                    batch = n + 1,
                    status_code = code,
                    status_message = %message,
                    "batch rejected by SERP provider"
                );
                report.batches_rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let (Some(path), false) = (snapshot_path, report.dry_run) {
        snapshot.write(path)?;
    }

    Ok(report)
}

/// Reads one spreadsheet's targets from the configured year tab, rolling it
/// over first when it is missing.
///
/// A dry run never rolls over: it reads the previous year's tab, which is
/// what the rollover would copy.
async fn read_targets(
    config: &AppConfig,
    sheets: &SheetsClient,
    spreadsheet_id: &str,
    dry_run: bool,
) -> anyhow::Result<Vec<Target>> {
    if !dry_run {
        sheets
            .ensure_year_sheet(spreadsheet_id, &config.sheet_title)
            .await?;
        return Ok(sheets
            .load_targets(spreadsheet_id, &config.sheet_title)
            .await?);
    }

    let title = match sheets
        .plan_year_sheet(spreadsheet_id, &config.sheet_title)
        .await?
    {
        YearSheet::Existing(existing) => existing.title,
        YearSheet::Rollover { previous, .. } => {
            tracing::info!(
                spreadsheet_id,
                from = %previous.title,
                to = %config.sheet_title,
                "dry-run: would roll over yearly sheet"
            );
            previous.title
        }
    };
    Ok(sheets.load_targets(spreadsheet_id, &title).await?)
}

#[cfg(test)]
#[path = "submit_test.rs"]
mod tests;
