// =============================================================================
// TENANT DIRECTORY - tenant id -> tenant record
// =============================================================================

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::tenant::Tenant;

/// Lookup of tenant records kept in the central datastore.
///
/// Errors returned here are infrastructure failures (the store could not be
/// reached); an unknown tenant is `Ok(None)`.
#[async_trait]
pub trait TenantDirectory: Send + Sync + std::fmt::Debug {
    /// Fetches one tenant by identifier
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>>;

    /// All tenant identifiers, sorted ascending
    async fn list(&self) -> Result<Vec<String>>;

    /// Inserts the given tenants, replacing the attributes of existing ids
    async fn seed(&self, tenants: &[Tenant]) -> Result<()>;
}

// =============================================================================
// POSTGRES BACKEND
// =============================================================================

#[derive(FromRow)]
struct TenantRow {
    id: String,
    data: Json<Map<String, Value>>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id,
            data: row.data.0,
        }
    }
}

/// Directory backed by the `tenants` table of the central database
#[derive(Clone, Debug)]
pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>> {
        let row: Option<TenantRow> = sqlx::query_as::<_, TenantRow>(
            "SELECT id, data FROM tenants WHERE id = $1"
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to look up tenant '{tenant_id}'"))?;

        Ok(row.map(Tenant::from))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM tenants ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tenants")?;

        Ok(ids)
    }

    async fn seed(&self, tenants: &[Tenant]) -> Result<()> {
        let mut tx: sqlx::Transaction<'static, sqlx::Postgres> = self.pool.begin().await?;

        for tenant in tenants {
            sqlx::query(
                r#"
                INSERT INTO tenants (id, data)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data
                "#,
            )
            .bind(&tenant.id)
            .bind(Json(&tenant.data))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to seed tenant '{}'", tenant.id))?;

            debug!("Seeded tenant '{}'", tenant.id);
        }

        tx.commit().await.context("Failed to commit tenant seed")?;
        info!("Seeded {} tenants into the central directory", tenants.len());
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// Directory held in process memory, for tests and database-less local runs
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    tenants: RwLock<BTreeMap<String, Tenant>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenants(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        let tenants: BTreeMap<String, Tenant> = tenants
            .into_iter()
            .map(|tenant: Tenant| (tenant.id.clone(), tenant))
            .collect();

        Self {
            tenants: RwLock::new(tenants),
        }
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>> {
        Ok(self.tenants.read().await.get(tenant_id).cloned())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.tenants.read().await.keys().cloned().collect())
    }

    async fn seed(&self, tenants: &[Tenant]) -> Result<()> {
        let mut map: tokio::sync::RwLockWriteGuard<'_, BTreeMap<String, Tenant>> = self.tenants.write().await;
        for tenant in tenants {
            map.insert(tenant.id.clone(), tenant.clone());
        }
        Ok(())
    }
}
