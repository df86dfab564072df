//! tests/common/mod.rs
//! A shared test helper to spawn the Axum app on an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{serve, Router};
use tokio::net::TcpListener as TokioTcpListener;

use tenancy_api::config::{environment::EnvironmentVariables, state::AppState};
use tenancy_api::core::server::create_app;
use tenancy_api::database::{
    seed::demo_tenants, InMemoryTenantDirectory, TenantConnections, TenantDirectory,
};

/// Spawns the app with default settings and the three demo tenants.
pub fn spawn_app() -> String {
    spawn_app_with(&[])
}

/// Spawns the app with extra environment variables and returns its base URL.
/// The tenant directory is in memory, so no database is needed.
pub fn spawn_app_with(vars: &[(&str, &str)]) -> String {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let environment: Arc<EnvironmentVariables> =
        Arc::new(EnvironmentVariables::from_vars(&vars).expect("Invalid test environment"));

    let directory: Arc<dyn TenantDirectory> =
        Arc::new(InMemoryTenantDirectory::with_tenants(demo_tenants()));
    let connections: TenantConnections = TenantConnections::new(environment.clone());

    // * Build the application exactly as main() does.
    let app: Router = create_app(AppState::new(environment, directory, connections));

    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    // * Convert std::net::TcpListener to tokio::net::TcpListener.
    let tokio_listener: TokioTcpListener = TokioTcpListener::from_std(std_listener)
        .expect("Failed to convert to tokio listener");

    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    // * Spawn the server in a background task.
    tokio::spawn(async move {
        serve(tokio_listener, app)
            .await
            .expect("Server failed");
    });

    format!("http://{}", addr)
}

/// Sends a GET and returns the status with the parsed JSON body.
pub async fn get_json(request: reqwest::RequestBuilder) -> (reqwest::StatusCode, serde_json::Value) {
    let resp: reqwest::Response = request.send().await.expect("Failed to execute request.");
    let status: reqwest::StatusCode = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Response was not JSON");
    (status, body)
}
