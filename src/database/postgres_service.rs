// =============================================================================
// DATABASE SERVICE - Central connection (tenant directory)
// =============================================================================

use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Executor, PgPool};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::environment::EnvironmentVariables;

// =============================================================================
// SQL CONSTANTS
// =============================================================================

/// Creates the tenants table in the central database
const INIT_CENTRAL_SQL: &str = include_str!("sql/schemas/central_tenants.sql");

/// Reported to PostgreSQL as `application_name`
pub const APPLICATION_NAME: &str = "tenancy-api";

// =============================================================================
// DATABASE SERVICE
// =============================================================================

/// Owns the central connection pool.
/// The pool is created by `initialize()` and handed out explicitly to the
/// components that need it; nothing reaches it through a global.
#[derive(Clone, Debug)]
pub struct DatabaseService {
    pool: Arc<OnceCell<PgPool>>,
    config: Arc<EnvironmentVariables>,
}

impl DatabaseService {
    /// Creates a new DatabaseService instance.
    /// Note: The pool is not initialized until `initialize()` is called.
    pub fn new(config: Arc<EnvironmentVariables>) -> Self {
        Self {
            pool: Arc::new(OnceCell::new()),
            config,
        }
    }

    /// Connects to the central database and creates the tenant directory table.
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing DatabaseService (central)...");

        self.pool.get_or_try_init(|| async {
            self.create_pool().await
        }).await?;

        let pool: &PgPool = self.get_pool()?;
        self.initialize_schema(pool).await?;

        info!("DatabaseService initialized successfully");
        Ok(())
    }

    /// Gracefully shuts down the service.
    pub async fn shutdown(&self) {
        info!("Initiating DatabaseService shutdown...");
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Central connection pool closed");
        } else {
            debug!("Central pool was not initialized, nothing to close");
        }
    }

    /// Returns the central connection pool.
    /// Errors if the pool has not been initialized.
    pub fn get_pool(&self) -> Result<&PgPool> {
        self.pool.get().ok_or_else(|| anyhow::anyhow!("Database pool not initialized"))
    }
}

// =============================================================================
// INTERNAL HELPERS
// =============================================================================

impl DatabaseService {
    async fn create_pool(&self) -> Result<PgPool> {
        let connect_options: PgConnectOptions = connect_options(
            &self.config,
            &self.config.db_host,
            self.config.db_port,
            &self.config.db_user,
            &self.config.db_password,
            &self.config.db_name,
        );

        let pool: PgPool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(30))
            .connect_with(connect_options)
            .await
            .context("Failed to create central database connection pool")?;

        Ok(pool)
    }

    async fn initialize_schema(&self, pool: &PgPool) -> Result<()> {
        info!("Executing central schema initialization...");

        pool.execute(INIT_CENTRAL_SQL)
            .await
            .context("Failed to execute central schema initialization SQL")?;

        info!("Central schema initialization completed");
        Ok(())
    }
}

/// Connection options with UTC timezone and SSL chosen by environment.
/// Shared by the central pool and every tenant pool.
pub fn connect_options(
    config: &EnvironmentVariables,
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    database: &str,
) -> PgConnectOptions {
    let options: PgConnectOptions = PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(username)
        .password(password)
        .database(database)
        .options([("timezone", "UTC"), ("application_name", APPLICATION_NAME)]);

    // Development: prefer SSL but don't require it
    if config.is_development() {
        options.ssl_mode(PgSslMode::Prefer)
    } else {
        options.ssl_mode(PgSslMode::Require)
    }
}
