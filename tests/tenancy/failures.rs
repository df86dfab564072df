//! tests/tenancy/failures.rs
//! Requests that cannot be bound to a tenant never reach the handler.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn missing_identifier_is_reported_as_none() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) =
        common::get_json(reqwest::Client::new().get(format!("{}/v1/tenant-info", base_url))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "error": "tenant_not_found",
            "message": "Tenant could not be identified",
            "attempted_tenant": "none"
        })
    );
}

#[tokio::test]
async fn unknown_tenant_echoes_attempted_id() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new()
            .get(format!("{}/v1/tenant-info", base_url))
            .header("X-Tenant-ID", "tenant9"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "tenant_not_found");
    assert_eq!(body["attempted_tenant"], "tenant9");
    assert!(body.get("tenant_id").is_none());
}

#[tokio::test]
async fn unknown_query_tenant_echoes_attempted_id() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new().get(format!("{}/v1/tenant-info?tenant=ghost", base_url)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "tenant_not_found");
    assert_eq!(body["message"], "Tenant could not be identified with id 'ghost'");
    assert_eq!(body["attempted_tenant"], "ghost");
}

#[tokio::test]
async fn unknown_header_tenant_does_not_fall_back_to_query() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new()
            .get(format!("{}/v1/tenant-info?tenant=tenant1", base_url))
            .header("X-Tenant-ID", "ghost"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["attempted_tenant"], "ghost");
}

#[tokio::test]
async fn empty_query_value_counts_as_missing() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new().get(format!("{}/v1/tenant-info?tenant=", base_url)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["attempted_tenant"], "none");
}
