//! Shared fixtures for the phase tests: config, clients wired to wiremock,
//! and canned Drive/Sheets responses.

use std::path::PathBuf;

use rankwatch_core::AppConfig;
use rankwatch_serp::{SerpClient, SerpCredentials};
use rankwatch_sheets::{Authenticator, SheetsClient};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        target_folder_id: "folder-1".to_owned(),
        sheet_title: "2026".to_owned(),
        language_code: "en".to_owned(),
        location_code: 2840,
        batch_max_size: 2,
        inter_request_delay_ms: 0,
        google_credentials_path: PathBuf::from("service_account.json"),
        dataforseo_credentials_path: PathBuf::from("dataforseocreds.json"),
        dataforseo_base_url: "http://127.0.0.1:1/".to_owned(),
        request_timeout_secs: 5,
        log_level: "info".to_owned(),
    }
}

pub(crate) fn sheets_client(server: &MockServer) -> SheetsClient {
    SheetsClient::with_base_urls(
        Authenticator::with_static_token("test-token"),
        5,
        &format!("{}/drive/v3", server.uri()),
        &format!("{}/v4", server.uri()),
    )
    .expect("sheets client")
}

pub(crate) fn serp_client(server: &MockServer) -> SerpClient {
    SerpClient::with_base_url(SerpCredentials::new("login", "secret"), 5, &server.uri())
        .expect("serp client")
}

/// One page listing the given `(id, name)` spreadsheets.
pub(crate) async fn mount_folder(server: &MockServer, files: &[(&str, &str)]) {
    let files: Vec<_> = files
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
        .mount(server)
        .await;
}

/// Metadata with a single `2026` tab `column_count` columns wide.
pub(crate) async fn mount_year_tab(server: &MockServer, spreadsheet_id: &str, sheet_id: i64, column_count: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{spreadsheet_id}")))
        .and(query_param("fields", "sheets.properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{"properties": {
                "sheetId": sheet_id,
                "title": "2026",
                "gridProperties": {"rowCount": 100, "columnCount": column_count}
            }}]
        })))
        .mount(server)
        .await;
}

/// Target rows (header included) for the `2026` tab.
pub(crate) async fn mount_targets(server: &MockServer, spreadsheet_id: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{spreadsheet_id}/values/2026!A:B")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "'2026'!A1:B1000",
            "majorDimension": "ROWS",
            "values": rows
        })))
        .mount(server)
        .await;
}
