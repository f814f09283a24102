//! Drive v3 and Sheets v4 request/response types.
//!
//! Only the fields the tracker reads are modelled; everything else in the
//! Google payloads is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Drive
// ---------------------------------------------------------------------------

/// One page of a Drive `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// A spreadsheet file found in the tracked folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Sheets: spreadsheet metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

/// Tab metadata: id, title and grid size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

impl Spreadsheet {
    /// Finds a tab by exact title.
    #[must_use]
    pub fn sheet(&self, title: &str) -> Option<&SheetProperties> {
        self.sheets
            .iter()
            .map(|s| &s.properties)
            .find(|p| p.title == title)
    }
}

// ---------------------------------------------------------------------------
// Sheets: values
// ---------------------------------------------------------------------------

/// A block of cell values. Trailing empty rows and cells are omitted by the
/// API, and `values` is absent entirely for an empty range.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
}

/// Renders a cell as text: strings as-is, numbers and booleans via
/// `to_string`, null as empty.
#[must_use]
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Sheets: batchUpdate
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub replies: Vec<Value>,
}

/// Builders for the `batchUpdate` request kinds the tracker issues.
pub mod requests {
    use super::{json, Value};

    /// Appends `length` columns to the right of a tab.
    #[must_use]
    pub fn append_columns(sheet_id: i64, length: u32) -> Value {
        json!({
            "appendDimension": {
                "sheetId": sheet_id,
                "dimension": "COLUMNS",
                "length": length
            }
        })
    }

    /// Adds a new tab sized `row_count` x `column_count`.
    #[must_use]
    pub fn add_sheet(title: &str, row_count: u32, column_count: u32) -> Value {
        json!({
            "addSheet": {
                "properties": {
                    "title": title,
                    "gridProperties": {
                        "rowCount": row_count.max(1),
                        "columnCount": column_count
                    }
                }
            }
        })
    }

    /// Copies rows `0..row_count`, columns `0..column_count` between tabs.
    #[must_use]
    pub fn copy_block(
        source_sheet_id: i64,
        destination_sheet_id: i64,
        row_count: u32,
        column_count: u32,
    ) -> Value {
        let grid = |sheet_id: i64| {
            json!({
                "sheetId": sheet_id,
                "startRowIndex": 0,
                "endRowIndex": row_count,
                "startColumnIndex": 0,
                "endColumnIndex": column_count
            })
        };
        json!({
            "copyPaste": {
                "source": grid(source_sheet_id),
                "destination": grid(destination_sheet_id),
                "pasteType": "PASTE_NORMAL"
            }
        })
    }
}
