// Tenant-scoped route definitions

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::api::middleware::tenant::initialize_tenancy;
use crate::config::state::AppState;
use super::handler;

/// Routes that only run once a tenant has been identified and activated.
/// `route_layer` keeps the tenancy check off unmatched paths, so those
/// still fall through to the 404 fallback.
pub fn tenant_info_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tenant-info", get(handler::tenant_info_handler))
        .route_layer(from_fn_with_state(state, initialize_tenancy))
}
