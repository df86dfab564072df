//! tests/tenancy/identification.rs
//! Header and query string identification on /v1/tenant-info.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn identifies_tenant_from_header() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new()
            .get(format!("{}/v1/tenant-info", base_url))
            .header("X-Tenant-ID", "tenant1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "tenant_id": "tenant1",
            "db": "tenant1_db",
            "message": "Successfully identified tenant"
        })
    );
}

#[tokio::test]
async fn identifies_tenant_from_query_parameter() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new().get(format!("{}/v1/tenant-info?tenant=tenant2", base_url)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenant_id"], "tenant2");
    assert_eq!(body["db"], "tenant2_db");
}

#[tokio::test]
async fn header_takes_precedence_over_query() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new()
            .get(format!("{}/v1/tenant-info?tenant=tenant2", base_url))
            .header("x-tenant-id", "tenant3"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenant_id"], "tenant3");
    assert_eq!(body["db"], "tenant3_db");
}

#[tokio::test]
async fn blank_header_falls_back_to_query() {
    let base_url: String = common::spawn_app();

    let (status, body): (StatusCode, Value) = common::get_json(
        reqwest::Client::new()
            .get(format!("{}/v1/tenant-info?tenant=tenant1", base_url))
            .header("X-Tenant-ID", ""),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenant_id"], "tenant1");
}

#[tokio::test]
async fn honours_configured_query_parameter() {
    let base_url: String = common::spawn_app_with(&[("TENANT_QUERY_PARAMETER", "org")]);
    let client: reqwest::Client = reqwest::Client::new();

    let (status, body): (StatusCode, Value) =
        common::get_json(client.get(format!("{}/v1/tenant-info?org=tenant3", base_url))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenant_id"], "tenant3");

    let (status, body): (StatusCode, Value) =
        common::get_json(client.get(format!("{}/v1/tenant-info?tenant=tenant3", base_url))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["attempted_tenant"], "none");
}
