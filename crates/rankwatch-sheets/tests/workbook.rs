//! Integration tests for `SheetsClient` against wiremock Drive/Sheets mocks.

use rankwatch_core::{RankResult, Target};
use rankwatch_sheets::{Authenticator, SheetsClient, SheetsError, YearSheet};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> SheetsClient {
    SheetsClient::with_base_urls(
        Authenticator::with_static_token("test-token"),
        30,
        &format!("{}/drive/v3", server.uri()),
        &format!("{}/v4", server.uri()),
    )
    .expect("client construction should not fail")
}

fn metadata(sheets: &[(i64, &str, u32, u32)]) -> serde_json::Value {
    let sheets: Vec<_> = sheets
        .iter()
        .map(|(id, title, rows, cols)| {
            json!({"properties": {
                "sheetId": id,
                "title": title,
                "index": 0,
                "sheetType": "GRID",
                "gridProperties": {"rowCount": rows, "columnCount": cols}
            }})
        })
        .collect();
    json!({ "sheets": sheets })
}

async fn mount_metadata(server: &MockServer, spreadsheet_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{spreadsheet_id}")))
        .and(query_param("fields", "sheets.properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Previous-year tab: a header plus `targets` rows, far fewer than its
/// 30-row grid.
async fn mount_previous_year_rows(server: &MockServer, targets: usize) {
    let mut rows = vec![json!(["Keyword", "URL"])];
    rows.extend((0..targets).map(|i| json!([format!("kw {i}"), "https://example.com/"])));
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/s1/values/2025!A:B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "'2025'!A1:B1000",
            "majorDimension": "ROWS",
            "values": rows
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_spreadsheets_follows_page_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{"id": "s3", "name": "Client C"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param(
            "q",
            "mimeType='application/vnd.google-apps.spreadsheet' and 'folder-1' in parents",
        ))
        .and(query_param("supportsAllDrives", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "page-2",
            "files": [{"id": "s1", "name": "Client A"}, {"id": "s2", "name": "Client B"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let files = client.list_spreadsheets("folder-1").await.unwrap();

    let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
}

#[tokio::test]
async fn api_errors_carry_google_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.list_spreadsheets("folder-1").await.unwrap_err();
    assert!(
        matches!(err, SheetsError::Api { status: 403, ref message, .. } if message == "The caller does not have permission"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn load_targets_reads_year_tab() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/s1/values/2026!A:B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "'2026'!A1:B1000",
            "majorDimension": "ROWS",
            "values": [
                ["Keyword", "URL"],
                ["blue widgets", "https://example.com/widgets"],
                [],
                ["red widgets", "https://red.example/"]
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let targets = client.load_targets("s1", "2026").await.unwrap();

    assert_eq!(
        targets,
        vec![
            Target::new("blue widgets", "https://example.com/widgets"),
            Target::new("", ""),
            Target::new("red widgets", "https://red.example/"),
        ]
    );
}

#[tokio::test]
async fn load_targets_without_values_is_no_target_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/s1/values/2026!A:B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "'2026'!A1:B1000",
            "majorDimension": "ROWS"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.load_targets("s1", "2026").await.unwrap_err();
    assert!(matches!(err, SheetsError::NoTargetData { .. }), "got: {err:?}");
}

#[tokio::test]
async fn ensure_year_sheet_returns_existing_tab() {
    let server = MockServer::start().await;
    mount_metadata(&server, "s1", metadata(&[(0, "2025", 30, 10), (9, "2026", 30, 4)])).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/s1:batchUpdate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let props = client.ensure_year_sheet("s1", "2026").await.unwrap();
    assert_eq!(props.sheet_id, 9);
}

#[tokio::test]
async fn ensure_year_sheet_rolls_over_previous_year() {
    let server = MockServer::start().await;
    mount_metadata(&server, "s1", metadata(&[(0, "2025", 30, 10)])).await;
    mount_previous_year_rows(&server, 2).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/s1:batchUpdate"))
        .and(body_partial_json(json!({"requests": [{"addSheet": {"properties": {
            "title": "2026",
            "gridProperties": {"rowCount": 3, "columnCount": 2}
        }}}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "s1",
            "replies": [{"addSheet": {"properties": {
                "sheetId": 555,
                "title": "2026",
                "gridProperties": {"rowCount": 3, "columnCount": 2}
            }}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/s1:batchUpdate"))
        .and(body_json(json!({"requests": [{"copyPaste": {
            "source": {"sheetId": 0, "startRowIndex": 0, "endRowIndex": 3,
                       "startColumnIndex": 0, "endColumnIndex": 2},
            "destination": {"sheetId": 555, "startRowIndex": 0, "endRowIndex": 3,
                            "startColumnIndex": 0, "endColumnIndex": 2},
            "pasteType": "PASTE_NORMAL"
        }}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "s1", "replies": [{}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let props = client.ensure_year_sheet("s1", "2026").await.unwrap();
    assert_eq!(props.sheet_id, 555);
    assert_eq!(props.title, "2026");
}

#[tokio::test]
async fn ensure_year_sheet_without_previous_year_fails() {
    let server = MockServer::start().await;
    mount_metadata(&server, "s1", metadata(&[(0, "Notes", 10, 3)])).await;

    let client = test_client(&server);
    let err = client.ensure_year_sheet("s1", "2026").await.unwrap_err();
    assert!(
        matches!(err, SheetsError::SheetNotFound { ref title, .. } if title == "2025"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn append_rank_columns_extends_grid_and_writes_raw_values() {
    let server = MockServer::start().await;
    mount_metadata(&server, "s1", metadata(&[(9, "2026", 30, 4)])).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/s1:batchUpdate"))
        .and(body_json(json!({"requests": [{"appendDimension": {
            "sheetId": 9, "dimension": "COLUMNS", "length": 2
        }}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "s1", "replies": [{}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/s1/values/2026!E:F"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_partial_json(json!({"values": [
            ["10/16/2026", "Ranking URL"],
            [3, "https://example.com/widgets"],
            [-1, ""]
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "s1",
            "updatedRange": "'2026'!E1:F3",
            "updatedRows": 3,
            "updatedColumns": 2,
            "updatedCells": 6
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let range = client
        .append_rank_columns(
            "s1",
            "2026",
            "10/16/2026",
            &[
                RankResult::ranked(3, "https://example.com/widgets"),
                RankResult::not_found(),
            ],
        )
        .await
        .unwrap();

    assert_eq!(range, "2026!E:F");
}

#[tokio::test]
async fn plan_year_sheet_counts_populated_rows_without_writing() {
    let server = MockServer::start().await;
    mount_metadata(&server, "s1", metadata(&[(0, "2025", 30, 10)])).await;
    mount_previous_year_rows(&server, 2).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/s1:batchUpdate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let plan = client.plan_year_sheet("s1", "2026").await.unwrap();

    assert!(
        matches!(plan, YearSheet::Rollover { ref previous, populated_rows: 3 } if previous.title == "2025"),
        "got: {plan:?}"
    );
}
