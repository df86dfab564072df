// =============================================================================
// TENANT CONNECTIONS - one pool per tenant database
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::environment::EnvironmentVariables;
use crate::database::postgres_service::connect_options;
use crate::models::tenant::TenantConnectionParams;

/// A pool entry remembers the parameters it was built from, so an updated
/// tenant record gets a fresh pool instead of the stale one.
#[derive(Debug)]
struct PoolEntry {
    params: TenantConnectionParams,
    pool: PgPool,
}

/// Registry of tenant connection pools, keyed by tenant id.
///
/// Pools are created lazily: no connection is opened until a handler actually
/// runs a query against the tenant database. The registry itself is shared by
/// all requests; what a request gets back is its own `PgPool` handle.
#[derive(Clone, Debug)]
pub struct TenantConnections {
    pools: Arc<RwLock<HashMap<String, PoolEntry>>>,
    config: Arc<EnvironmentVariables>,
}

impl TenantConnections {
    pub fn new(config: Arc<EnvironmentVariables>) -> Self {
        Self {
            pools: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Returns the pool for the tenant described by `params`, creating it on
    /// first use.
    pub async fn pool_for(&self, params: &TenantConnectionParams) -> PgPool {
        {
            let pools: tokio::sync::RwLockReadGuard<'_, HashMap<String, PoolEntry>> = self.pools.read().await;
            if let Some(entry) = pools.get(&params.tenant_id) {
                if entry.params == *params && !entry.pool.is_closed() {
                    return entry.pool.clone();
                }
            }
        }

        let mut pools: tokio::sync::RwLockWriteGuard<'_, HashMap<String, PoolEntry>> = self.pools.write().await;

        // Another request may have built it while we waited for the write lock
        if let Some(entry) = pools.get(&params.tenant_id) {
            if entry.params == *params && !entry.pool.is_closed() {
                return entry.pool.clone();
            }
            warn!("Pool for tenant '{}' is stale or closed. Will recreate.", params.tenant_id);
        }

        info!(
            "Creating pool for tenant '{}' (database '{}' on {}:{})",
            params.tenant_id, params.database, params.host, params.port
        );

        let pool: PgPool = self.create_pool(params);
        let previous: Option<PoolEntry> = pools.insert(
            params.tenant_id.clone(),
            PoolEntry {
                params: params.clone(),
                pool: pool.clone(),
            },
        );
        drop(pools);

        // Close waits for checked-out connections, so it must not hold the registry
        if let Some(previous) = previous {
            tokio::spawn(async move {
                previous.pool.close().await;
                info!("Stale pool for tenant '{}' closed", previous.params.tenant_id);
            });
        }

        pool
    }

    /// Lists tenant ids that currently have a pool
    #[cfg(test)]
    pub async fn active_tenants(&self) -> Vec<String> {
        let pools: tokio::sync::RwLockReadGuard<'_, HashMap<String, PoolEntry>> = self.pools.read().await;
        let mut ids: Vec<String> = pools.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Closes all tenant pools
    pub async fn close_all(&self) {
        let drained: Vec<(String, PoolEntry)> = self.pools.write().await.drain().collect();
        for (tenant_id, entry) in drained {
            info!("Closing pool for tenant '{}'...", tenant_id);
            entry.pool.close().await;
        }
        info!("All tenant pools closed");
    }

    fn create_pool(&self, params: &TenantConnectionParams) -> PgPool {
        let options: PgConnectOptions = connect_options(
            &self.config,
            &params.host,
            params.port,
            &params.username,
            &params.password,
            &params.database,
        );

        PgPoolOptions::new()
            .max_connections(10)
            .min_connections(0)
            .acquire_timeout(Duration::from_secs(self.config.default_timeout_seconds))
            .idle_timeout(Duration::from_secs(30))
            .connect_lazy_with(options)
    }
}
