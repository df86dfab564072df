// Liveness check

use axum::{body::Bytes, http::StatusCode};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{info, instrument};

use crate::utils::response_handler::HandlerResponse;

/// Reports that the API is up. Never touches tenancy or the database.
#[instrument(skip(_body))]
pub async fn health_handler(
    _body: Bytes, // Forces body reading and triggers size limits
) -> HandlerResponse {
    info!("Health endpoint called");

    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "status": "ok",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }))
        .message("API is running")
}
