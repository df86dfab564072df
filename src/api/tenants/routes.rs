// Tenant discovery route definitions

use axum::{routing::get, Router};

use crate::config::state::AppState;
use super::handler;

/// Creates router with the tenant listing endpoint
pub fn tenant_routes() -> Router<AppState> {
    Router::new().route("/tenants", get(handler::list_tenants_handler))
}
