//! Collection phase: ready SERP tasks → result index → rank columns.
//!
//! A rejected ready-listing poll stops the run before any sheet is touched.
//! After that, spreadsheets are written one at a time; a failure part-way
//! leaves the earlier spreadsheets updated.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use rankwatch_core::{match_targets, AppConfig, Rank, Target};
use rankwatch_serp::SerpClient;
use rankwatch_sheets::workbook::date_header;
use rankwatch_sheets::SheetsClient;

use crate::snapshot::Snapshot;

/// Totals for one collection run.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CollectReport {
    pub keywords_collected: usize,
    pub tasks_skipped: usize,
    pub spreadsheets: usize,
    pub ranked: usize,
    pub not_found: usize,
}

impl CollectReport {
    /// Ready tasks that produced no usable result.
    pub(crate) fn diagnostics(&self) -> usize {
        self.tasks_skipped
    }
}

impl fmt::Display for CollectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collected {} keywords ({} ready tasks skipped); wrote {} spreadsheets: \
             {} ranked, {} not found",
            self.keywords_collected,
            self.tasks_skipped,
            self.spreadsheets,
            self.ranked,
            self.not_found
        )
    }
}

/// Where the targets of one spreadsheet come from.
struct Source {
    spreadsheet_id: String,
    name: String,
    targets: Option<Vec<Target>>,
}

/// Collects ready results and appends a rank column pair dated `today` to
/// every target spreadsheet.
///
/// With `snapshot_path` set, targets come from that snapshot instead of the
/// sheets, and the file is deleted once every spreadsheet was written.
///
/// # Errors
///
/// Returns an error if the ready listing is rejected, a target keyword has
/// no collected result, or any Sheets call fails.
pub(crate) async fn run_collect(
    config: &AppConfig,
    sheets: &SheetsClient,
    serp: &SerpClient,
    snapshot_path: Option<&Path>,
    today: NaiveDate,
) -> anyhow::Result<CollectReport> {
    let collection = serp.collect_ready_results().await?;
    let mut report = CollectReport {
        keywords_collected: collection.index.len(),
        tasks_skipped: collection.skipped,
        ..CollectReport::default()
    };

    let sources: Vec<Source> = match snapshot_path {
        Some(path) => Snapshot::read(path)?
            .spreadsheets
            .into_iter()
            .map(|entry| Source {
                spreadsheet_id: entry.spreadsheet_id,
                name: entry.name,
                targets: Some(entry.targets),
            })
            .collect(),
        None => sheets
            .list_spreadsheets(&config.target_folder_id)
            .await?
            .into_iter()
            .map(|file| Source {
                spreadsheet_id: file.id,
                name: file.name,
                targets: None,
            })
            .collect(),
    };

    let header = date_header(today);
    for source in sources {
        let id = source.spreadsheet_id.as_str();
        sheets.ensure_year_sheet(id, &config.sheet_title).await?;
        let targets = match source.targets {
            Some(targets) => targets,
            None => sheets.load_targets(id, &config.sheet_title).await?,
        };

        let results = match_targets(&targets, &collection.index)?;
        let ranked = results
            .iter()
            .filter(|r| matches!(r.rank, Rank::Ranked(_)))
            .count();
        let range = sheets
            .append_rank_columns(id, &config.sheet_title, &header, &results)
            .await?;

        tracing::info!(
            spreadsheet_id = id,
            name = %source.name,
            range = %range,
            ranked,
            not_found = results.len() - ranked,
            "appended rank columns"
        );
        report.spreadsheets += 1;
        report.ranked += ranked;
        report.not_found += results.len() - ranked;

        crate::pause(config).await;
    }

    if let Some(path) = snapshot_path {
        Snapshot::remove(path)?;
    }

    Ok(report)
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
