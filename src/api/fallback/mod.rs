// Start of file: src/api/fallback/mod.rs

use axum::http::{StatusCode, Uri};
use tracing::warn;

use crate::utils::response_handler::{status_code_slug, HandlerResponse};

/// Unknown routes get the same JSON error shape as every other failure
pub async fn fallback_handler(uri: Uri) -> HandlerResponse {
    warn!("No route for {}", uri.path());

    HandlerResponse::error(
        StatusCode::NOT_FOUND,
        &status_code_slug(StatusCode::NOT_FOUND),
        format!("The requested route '{}' does not exist", uri.path()),
    )
}

// End of file: src/api/fallback/mod.rs
