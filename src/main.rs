// Start of file: src/main.rs

use std::sync::Arc;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;

use tenancy_api::config::{environment::EnvironmentVariables, state::AppState};
use tenancy_api::core::{logging, server};
use tenancy_api::database::{
    seed::seed_demo_tenants, DatabaseService, PgTenantDirectory, TenantConnections, TenantDirectory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // * Initialize logging before anything else can log
    logging::init_tracing();

    let environment: Arc<EnvironmentVariables> = Arc::new(EnvironmentVariables::load()?);

    // * Central database: holds the tenant directory
    let database: DatabaseService = DatabaseService::new(environment.clone());
    database.initialize().await?;

    let central_pool: PgPool = database.get_pool()?.clone();
    let directory: Arc<dyn TenantDirectory> = Arc::new(PgTenantDirectory::new(central_pool));

    if environment.seed_demo_tenants {
        seed_demo_tenants(directory.as_ref()).await?;
    }

    let connections: TenantConnections = TenantConnections::new(environment.clone());
    let state: AppState = AppState::new(environment.clone(), directory, connections.clone());

    let app: axum::Router = server::create_app(state);
    let listener: TcpListener = server::setup_listener(&environment).await?;

    info!("Server listening on: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    // * Gracefully close database connections
    connections.close_all().await;
    database.shutdown().await;

    Ok(())
}

// End of file: src/main.rs
