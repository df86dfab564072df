// Unified response system for consistent API responses
// Handlers build a HandlerResponse; the middleware renders every response,
// including bare status codes produced by layers, as JSON.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, Request, Response,
        response::Parts, StatusCode,
    },
    Json,
    middleware::Next,
    response::IntoResponse,
};
use serde_json::{json, Map, Value};
use std::convert::Infallible;
use tracing::{debug, error};

use crate::utils::utils::to_two_space_indented_json;

/// Convenience struct for building responses in handlers
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status_code: StatusCode,
    pub data: Value,
}

impl HandlerResponse {
    /// Creates a new response with specified status code
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            data: Value::Object(Map::new()),
        }
    }

    /// Sets the JSON payload
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Adds a human-readable `message` field to an object payload
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Value::Object(map) = &mut self.data {
            map.insert("message".to_owned(), Value::String(message.into()));
        }
        self
    }

    /// Error payload `{error, message}` for the given status
    pub fn error(status_code: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self::new(status_code)
            .data(json!({ "error": code }))
            .message(message)
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response: Response<Body> = Json(self.data.clone()).into_response();

        *response.status_mut() = self.status_code;

        // Store HandlerResponse in extensions for middleware processing
        response.extensions_mut().insert(self);
        response
    }
}

/// `Not Found` -> `not_found`
pub fn status_code_slug(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Logs the rendered body with proper JSON indentation
fn log_formatted_response(status: StatusCode, body: &Value) {
    match to_two_space_indented_json(body) {
        Ok(spaced_json) => debug!("\nFinal response ({}):\n{}", status.as_u16(), spaced_json),
        Err(err) => error!("Failed to format response JSON: {:?}", err),
    }
}

/// Builds the final response with JSON content type
fn build_final_response(parts: Parts, body: &Value) -> Response<Body> {
    let json_body: Vec<u8> = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut new_parts: Parts = parts;

    new_parts.headers.remove(CONTENT_LENGTH);
    new_parts.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(new_parts, Body::from(json_body))
}

/// Middleware that renders every response as JSON.
/// Handler payloads are sent unchanged; error statuses without a payload
/// (unknown route, wrong method, timeout, oversized body) get `{error, message}`.
pub async fn response_wrapper(
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, Infallible> {
    let response: Response<Body> = next.run(req).await;

    let handler_data: Option<Value> = response
        .extensions()
        .get::<HandlerResponse>()
        .map(|r: &HandlerResponse| r.data.clone());

    let body: Value = match handler_data {
        Some(data) => data,
        None if response.status().is_client_error() || response.status().is_server_error() => {
            let status: StatusCode = response.status();
            json!({
                "error": status_code_slug(status),
                "message": status.canonical_reason().unwrap_or("Unknown Status"),
            })
        }
        None => return Ok(response),
    };

    let (parts, _) = response.into_parts();

    log_formatted_response(parts.status, &body);

    Ok(build_final_response(parts, &body))
}
