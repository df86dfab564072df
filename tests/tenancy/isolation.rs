//! tests/tenancy/isolation.rs
//! Concurrent requests for different tenants never see each other's context.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;
use tokio::task::JoinHandle;

const TENANTS: [&str; 3] = ["tenant1", "tenant2", "tenant3"];

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_stay_on_their_own_tenant() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();

    let handles: Vec<JoinHandle<(String, StatusCode, Value)>> = (0..60)
        .map(|i: usize| {
            let tenant: String = TENANTS[i % TENANTS.len()].to_owned();
            // * Alternate between header and query identification
            let request: reqwest::RequestBuilder = if i % 2 == 0 {
                client
                    .get(format!("{}/v1/tenant-info", base_url))
                    .header("X-Tenant-ID", tenant.as_str())
            } else {
                client.get(format!("{}/v1/tenant-info?tenant={}", base_url, tenant))
            };

            tokio::spawn(async move {
                let (status, body): (StatusCode, Value) = common::get_json(request).await;
                (tenant, status, body)
            })
        })
        .collect();

    for handle in handles {
        let (tenant, status, body): (String, StatusCode, Value) = handle.await.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tenant_id"], tenant.as_str());
        assert_eq!(body["db"], format!("{}_db", tenant));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failures_do_not_leak_into_successful_requests() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();

    let ok: JoinHandle<(StatusCode, Value)> = tokio::spawn(common::get_json(
        client
            .get(format!("{}/v1/tenant-info", base_url))
            .header("X-Tenant-ID", "tenant2"),
    ));
    let missing: JoinHandle<(StatusCode, Value)> =
        tokio::spawn(common::get_json(client.get(format!("{}/v1/tenant-info", base_url))));

    let (ok_status, ok_body): (StatusCode, Value) = ok.await.unwrap();
    let (missing_status, missing_body): (StatusCode, Value) = missing.await.unwrap();

    assert_eq!(ok_status, StatusCode::OK);
    assert_eq!(ok_body["db"], "tenant2_db");
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_body["attempted_tenant"], "none");
}
