// Global error handling for HTTP middleware layers

use axum::{
    BoxError,
    http::StatusCode,
    response::IntoResponse,
};
use std::error::Error;
// tower's error type for timeouts
use tower::timeout::error::Elapsed;
// Axum uses http_body_util for length-limiting
use http_body_util::LengthLimitError;
use tracing::{error, warn};

/// Maps layer errors to HTTP status codes; `response_wrapper` turns the bare
/// status into a JSON body
pub async fn handle_global_error(err: BoxError) -> impl IntoResponse {
    // 413 if the body was too large
    if err.is::<LengthLimitError>() || find_cause::<LengthLimitError>(&*err).is_some() {
        warn!("Request body too large: {}", err);
        return StatusCode::PAYLOAD_TOO_LARGE;
    }

    // 408 if the request took too long
    if err.is::<Elapsed>() {
        warn!("Request timed out: {}", err);
        return StatusCode::REQUEST_TIMEOUT;
    }

    // Otherwise, 500
    error!("Unhandled internal error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Helper function to find specific error type in error chain
pub fn find_cause<T: Error + 'static>(err: &dyn Error) -> Option<&T> {
    let mut source: Option<&dyn Error> = err.source();

    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }

    None
}
