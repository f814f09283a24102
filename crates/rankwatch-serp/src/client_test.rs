use serde_json::json;

use super::*;

fn test_client(base_url: &str) -> SerpClient {
    SerpClient::with_base_url(SerpCredentials::new("login", "secret"), 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn endpoint_url_joins_relative_path() {
    let client = test_client("https://api.dataforseo.com");
    let url = client.endpoint_url(TASKS_READY_PATH).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.dataforseo.com/v3/serp/google/organic/tasks_ready"
    );
}

#[test]
fn endpoint_url_accepts_leading_slash_follow_up_paths() {
    let client = test_client("http://127.0.0.1:9999/");
    let url = client
        .endpoint_url("/v3/serp/google/organic/task_get/regular/abc-123")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:9999/v3/serp/google/organic/task_get/regular/abc-123"
    );
}

#[test]
fn endpoint_url_keeps_base_path_prefix() {
    let client = test_client("http://localhost/proxy");
    let url = client.endpoint_url(TASK_POST_PATH).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost/proxy/v3/serp/google/organic/task_post"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = SerpClient::with_base_url(SerpCredentials::new("a", "b"), 30, "not a url");
    assert!(matches!(result, Err(SerpError::InvalidUrl { .. })));
}

#[test]
fn check_api_error_accepts_success_code() {
    assert!(SerpClient::check_api_error(&json!({"status_code": 20000})).is_ok());
}

#[test]
fn check_api_error_surfaces_code_and_message() {
    let err = SerpClient::check_api_error(&json!({
        "status_code": 40501,
        "status_message": "Invalid Field: 'keyword'."
    }))
    .unwrap_err();
    assert!(
        matches!(err, SerpError::Api { code: 40501, ref message } if message == "Invalid Field: 'keyword'.")
    );
}

#[test]
fn check_api_error_without_status_is_error() {
    assert!(matches!(
        SerpClient::check_api_error(&json!({})),
        Err(SerpError::Api { code: 0, .. })
    ));
}

fn finished_task(value: serde_json::Value) -> FinishedTask {
    serde_json::from_value(value).expect("fixture should deserialize")
}

#[test]
fn keyword_result_prefers_task_data_keyword() {
    let task = finished_task(json!({
        "id": "t1",
        "status_code": 20000,
        "data": {"keyword": "blue widgets"},
        "result": [{
            "keyword": "blue widgets ",
            "items": [
                {"type": "organic", "rank_absolute": 1, "url": "https://a.com/", "domain": "a.com"}
            ]
        }]
    }));
    let result = SerpClient::keyword_result(task).unwrap();
    assert_eq!(result.keyword, "blue widgets");
    assert_eq!(result.entries.len(), 1);
}

#[test]
fn keyword_result_drops_items_without_rank() {
    let task = finished_task(json!({
        "id": "t1",
        "status_code": 20000,
        "data": {"keyword": "kw"},
        "result": [{
            "items": [
                {"type": "people_also_ask"},
                {"type": "organic", "rank_absolute": 2, "url": "https://b.com/x", "domain": "b.com"}
            ]
        }]
    }));
    let result = SerpClient::keyword_result(task).unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].rank_absolute, 2);
}

#[test]
fn keyword_result_skips_null_result() {
    let task = finished_task(json!({
        "id": "t1",
        "status_code": 20000,
        "data": {"keyword": "kw"},
        "result": null
    }));
    assert!(SerpClient::keyword_result(task).is_none());
}

#[test]
fn keyword_result_skips_empty_items() {
    let task = finished_task(json!({
        "id": "t1",
        "status_code": 20000,
        "data": {"keyword": "kw"},
        "result": [{"items": []}]
    }));
    assert!(SerpClient::keyword_result(task).is_none());
}

#[test]
fn keyword_result_skips_failed_task() {
    let task = finished_task(json!({
        "id": "t1",
        "status_code": 40102,
        "status_message": "No Search Results.",
        "data": {"keyword": "kw"},
        "result": null
    }));
    assert!(SerpClient::keyword_result(task).is_none());
}
