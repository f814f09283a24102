//! Rank-tracking operations on one spreadsheet: reading targets, yearly tab
//! rollover, and appending a dated pair of rank columns.
//!
//! A tracked tab holds targets in columns A (keyword) and B (URL) under a
//! header row. Every collection run appends two columns to the right of the
//! grid: the date header above the ranks, and `Ranking URL` above the
//! matched URLs.

use chrono::NaiveDate;
use rankwatch_core::{a1_range, column_letter, RankResult, Target};
use serde_json::{json, Value};

use crate::client::SheetsClient;
use crate::error::SheetsError;
use crate::types::{cell_text, requests, SheetProperties};

/// Two-column range holding keyword/URL targets.
pub const TARGET_RANGE: &str = "A:B";
/// Header of the second appended column.
pub const RANK_URL_HEADER: &str = "Ranking URL";
/// Columns appended per run and copied on rollover.
const RANK_COLUMNS: u32 = 2;

/// State of a year tab before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearSheet {
    Existing(SheetProperties),
    /// Missing; would be created from `previous`, copying its first
    /// `populated_rows` rows.
    Rollover {
        previous: SheetProperties,
        populated_rows: u32,
    },
}

/// Formats the header of a new rank column (`MM/DD/YYYY`).
#[must_use]
pub fn date_header(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

impl SheetsClient {
    /// Reads the targets on `sheet_title`, skipping the header row.
    ///
    /// Rows keep their position: a blank row yields a [`Target`] with an
    /// empty keyword so results line up with the sheet when written back.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::NoTargetData`] when the range holds no rows
    /// beyond the header, plus any client error from the read.
    pub async fn load_targets(
        &self,
        spreadsheet_id: &str,
        sheet_title: &str,
    ) -> Result<Vec<Target>, SheetsError> {
        let range = a1_range(sheet_title, TARGET_RANGE);
        let value_range = self.read_range(spreadsheet_id, &range).await?;
        let targets = targets_from_rows(value_range.values.unwrap_or_default());

        if targets.is_empty() {
            return Err(SheetsError::NoTargetData {
                spreadsheet_id: spreadsheet_id.to_owned(),
                range,
            });
        }
        tracing::debug!(spreadsheet_id, count = targets.len(), "loaded targets");
        Ok(targets)
    }

    /// Looks up the tab named `sheet_title` without changing anything.
    ///
    /// When the tab is missing and the title is a year, the previous year's
    /// tab is the rollover template; its populated target rows are counted
    /// so the new tab can be sized to them.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::SheetNotFound`] when the tab is missing and no
    /// previous-year tab exists to roll over from (or the title is not a
    /// year), plus any client error.
    pub async fn plan_year_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_title: &str,
    ) -> Result<YearSheet, SheetsError> {
        let spreadsheet = self.get_spreadsheet(spreadsheet_id).await?;
        if let Some(existing) = spreadsheet.sheet(sheet_title) {
            return Ok(YearSheet::Existing(existing.clone()));
        }

        let not_found = |title: &str| SheetsError::SheetNotFound {
            spreadsheet_id: spreadsheet_id.to_owned(),
            title: title.to_owned(),
        };
        let previous_title =
            previous_year_title(sheet_title).ok_or_else(|| not_found(sheet_title))?;
        let previous = spreadsheet
            .sheet(&previous_title)
            .ok_or_else(|| not_found(&previous_title))?
            .clone();

        let range = a1_range(&previous.title, TARGET_RANGE);
        let populated = self
            .read_range(spreadsheet_id, &range)
            .await?
            .values
            .map_or(0, |rows| rows.len());

        Ok(YearSheet::Rollover {
            previous,
            populated_rows: u32::try_from(populated).unwrap_or(u32::MAX),
        })
    }

    /// Makes sure a tab named `sheet_title` exists.
    ///
    /// A missing year tab is rolled over from the previous year (see
    /// [`Self::plan_year_sheet`]): a new tab as tall as the previous year's
    /// populated target rows is added and those rows are copied verbatim.
    ///
    /// # Errors
    ///
    /// See [`Self::plan_year_sheet`].
    pub async fn ensure_year_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_title: &str,
    ) -> Result<SheetProperties, SheetsError> {
        let (previous, row_count) = match self.plan_year_sheet(spreadsheet_id, sheet_title).await? {
            YearSheet::Existing(existing) => return Ok(existing),
            YearSheet::Rollover {
                previous,
                populated_rows,
            } => (previous, populated_rows),
        };

        tracing::info!(
            spreadsheet_id,
            from = %previous.title,
            to = sheet_title,
            rows = row_count,
            "rolling over yearly sheet"
        );

        let response = self
            .batch_update(
                spreadsheet_id,
                vec![requests::add_sheet(sheet_title, row_count, RANK_COLUMNS)],
            )
            .await?;
        let added: SheetProperties = response
            .replies
            .into_iter()
            .next()
            .and_then(|mut reply| {
                reply
                    .get_mut("addSheet")
                    .and_then(|added| added.get_mut("properties"))
                    .map(Value::take)
            })
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| SheetsError::Deserialize {
                context: format!("addSheet reply ({spreadsheet_id})"),
                source: e,
            })?
            .ok_or_else(|| SheetsError::SheetNotFound {
                spreadsheet_id: spreadsheet_id.to_owned(),
                title: sheet_title.to_owned(),
            })?;

        if row_count > 0 {
            self.batch_update(
                spreadsheet_id,
                vec![requests::copy_block(
                    previous.sheet_id,
                    added.sheet_id,
                    row_count,
                    RANK_COLUMNS,
                )],
            )
            .await?;
        }

        Ok(added)
    }

    /// Appends two columns to `sheet_title` and writes the date header, the
    /// `Ranking URL` header and one row per result beneath them.
    ///
    /// Returns the A1 range written.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::SheetNotFound`] if the tab does not exist, plus
    /// any client error.
    pub async fn append_rank_columns(
        &self,
        spreadsheet_id: &str,
        sheet_title: &str,
        date_header: &str,
        results: &[RankResult],
    ) -> Result<String, SheetsError> {
        let spreadsheet = self.get_spreadsheet(spreadsheet_id).await?;
        let sheet = spreadsheet
            .sheet(sheet_title)
            .ok_or_else(|| SheetsError::SheetNotFound {
                spreadsheet_id: spreadsheet_id.to_owned(),
                title: sheet_title.to_owned(),
            })?;
        let column_count = sheet.grid_properties.column_count;

        self.batch_update(
            spreadsheet_id,
            vec![requests::append_columns(sheet.sheet_id, RANK_COLUMNS)],
        )
        .await?;

        let range = a1_range(sheet_title, &appended_columns(column_count));
        self.write_range(spreadsheet_id, &range, rank_rows(date_header, results))
            .await?;

        tracing::debug!(spreadsheet_id, range = %range, rows = results.len(), "wrote rank columns");
        Ok(range)
    }
}

/// Converts raw rows into targets, dropping the header row.
fn targets_from_rows(rows: Vec<Vec<Value>>) -> Vec<Target> {
    rows.into_iter()
        .skip(1)
        .map(|row| {
            let mut cells = row.iter().map(cell_text);
            let keyword = cells.next().unwrap_or_default();
            let url = cells.next().unwrap_or_default();
            Target { keyword, url }
        })
        .collect()
}

/// `"2026"` -> `"2025"`; non-year titles have no predecessor.
fn previous_year_title(title: &str) -> Option<String> {
    let year: i32 = title.trim().parse().ok()?;
    Some((year - 1).to_string())
}

/// The two columns just past a grid `column_count` wide, e.g. `5` -> `F:G`.
fn appended_columns(column_count: u32) -> String {
    format!(
        "{}:{}",
        column_letter(column_count + 1),
        column_letter(column_count + RANK_COLUMNS)
    )
}

fn rank_rows(date_header: &str, results: &[RankResult]) -> Vec<Vec<Value>> {
    let mut rows = Vec::with_capacity(results.len() + 1);
    rows.push(vec![json!(date_header), json!(RANK_URL_HEADER)]);
    rows.extend(
        results
            .iter()
            .map(|r| vec![json!(r.rank.as_cell_value()), json!(r.url)]),
    );
    rows
}
