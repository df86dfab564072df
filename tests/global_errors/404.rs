//! tests/global_errors/404.rs
//! Ensures that hitting an unknown route returns a JSON 404.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn returns_404_for_nonexistent_route() {
    let base_url: String = common::spawn_app();

    let (status, json): (StatusCode, Value) =
        common::get_json(reqwest::Client::new().get(format!("{}/does-not-exist", base_url))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["message"], "The requested route '/does-not-exist' does not exist");
}

#[tokio::test]
async fn unknown_route_under_v1_is_not_a_tenancy_error() {
    let base_url: String = common::spawn_app();

    let (status, json): (StatusCode, Value) =
        common::get_json(reqwest::Client::new().get(format!("{}/v1/nope", base_url))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert!(json.get("attempted_tenant").is_none());
}
