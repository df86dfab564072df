//! tests/global_errors/405.rs
//! Ensures that a known route called with the wrong method returns a JSON 405.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn returns_405_for_wrong_method() {
    let base_url: String = common::spawn_app();

    let (status, json): (StatusCode, Value) =
        common::get_json(reqwest::Client::new().delete(format!("{}/v1/tenants", base_url))).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"], "method_not_allowed");
    assert_eq!(json["message"], "Method Not Allowed");
}
