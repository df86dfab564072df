// Tenant discovery handlers

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::{error, info, instrument};

use crate::api::middleware::resolver::TENANT_ID_HEADER;
use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

/// Lists every registered tenant id and how to select one.
/// Ungated: it works with or without a tenant identifier on the request.
#[instrument(name = "list_tenants", skip(state))]
pub async fn list_tenants_handler(State(state): State<AppState>) -> HandlerResponse {
    match state.directory.list().await {
        Ok(tenants) => {
            info!("Successfully retrieved {} tenants", tenants.len());

            let query_parameter: &str = &state.environment.tenant_query_parameter;
            HandlerResponse::new(StatusCode::OK).data(json!({
                "available_tenants": tenants,
                "usage": {
                    "query_parameter": format!("Add ?{query_parameter}=TENANT_ID to your request"),
                    "header": format!("Add {}: TENANT_ID header to your request", TENANT_ID_HEADER.to_uppercase()),
                },
            }))
        }
        Err(e) => {
            error!("Failed to list tenants: {:#}", e);
            HandlerResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "tenant_directory_unavailable",
                "Tenant directory is unavailable",
            )
        }
    }
}
