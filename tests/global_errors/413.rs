//! tests/global_errors/413.rs
//! Ensures that a payload over MAX_REQUEST_BODY_SIZE triggers 413.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn returns_413_when_payload_exceeds_global_limit() {
    let base_url: String = common::spawn_app_with(&[("MAX_REQUEST_BODY_SIZE", "1024")]);

    let oversized_payload: Vec<u8> = vec![b'X'; 1024 + 100];

    let (status, json): (StatusCode, Value) = common::get_json(
        reqwest::Client::new()
            .get(format!("{}/v1/health", base_url))
            .body(oversized_payload),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "payload_too_large");
    assert_eq!(json["message"], "Payload Too Large");
}
