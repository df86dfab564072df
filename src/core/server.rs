// Application server configuration and setup

use std::time::Duration;
use axum::{
    Router,
    middleware::from_fn,
    extract::DefaultBodyLimit,
    error_handling::HandleErrorLayer,
};
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::trace::TraceLayer;
use tokio::{signal, net::TcpListener};
use listenfd::ListenFd;
use anyhow::Result;
use tracing::{error, info};

use crate::config::environment::EnvironmentVariables;
use crate::config::state::AppState;
use crate::api::fallback::fallback_handler;
use crate::api::health::routes::health_routes;
use crate::api::tenant_info::routes::tenant_info_routes;
use crate::api::tenants::routes::tenant_routes;
use crate::utils::{
    error_handler::handle_global_error,
    response_handler::response_wrapper
};

/// Creates and configures the application router with all middleware layers
pub fn create_app(state: AppState) -> Router {
    let env: &EnvironmentVariables = &state.environment;

    let v1: Router<AppState> = Router::new()
        // * Ungated: no tenant required
        .merge(health_routes())
        .merge(tenant_routes())
        // * Gated: tenancy is initialized before the handler runs
        .merge(tenant_info_routes(state.clone()));

    Router::new()
        .nest("/v1", v1)
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(response_wrapper))
                .layer(HandleErrorLayer::new(handle_global_error))
                .layer(TimeoutLayer::new(Duration::from_secs(env.default_timeout_seconds)))
                .layer(DefaultBodyLimit::max(env.max_request_body_size))
        )
        .with_state(state)
}

/// Sets up the TCP listener from environment or binds to new address
pub async fn setup_listener(env: &EnvironmentVariables) -> Result<TcpListener> {
    let mut listenfd: ListenFd = ListenFd::from_env();

    let listener: TcpListener = match listenfd.take_tcp_listener(0)? {
        Some(std_listener) => {
            std_listener.set_nonblocking(true)?;
            TcpListener::from_std(std_listener)?
        }
        None => {
            let addr: String = format!("{}:{}", env.host, env.port);
            TcpListener::bind(&addr).await?
        }
    };

    Ok(listener)
}

/// Handles graceful shutdown signals (Ctrl+C and TERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install TERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Shutting down via Ctrl+C"),
        _ = terminate => info!("Shutting down via TERM signal"),
    }
}
