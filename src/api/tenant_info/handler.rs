// Tenant-scoped handlers

use axum::{http::StatusCode, Extension};
use serde_json::json;
use tracing::{info, instrument};

use crate::api::middleware::tenant::TenantContext;
use crate::utils::response_handler::HandlerResponse;

/// Echoes the tenant this request was bound to and its database name
#[instrument(skip_all, fields(tenant_id = %context.tenant_id()))]
pub async fn tenant_info_handler(Extension(context): Extension<TenantContext>) -> HandlerResponse {
    info!("Serving tenant info from {}", context.provenance);

    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "tenant_id": context.tenant_id(),
            "db": context.database.name,
        }))
        .message("Successfully identified tenant")
}
