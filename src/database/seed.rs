// Administrative seeding of the demo tenants

use anyhow::{Context, Result};
use tracing::info;

use crate::database::tenant_directory::TenantDirectory;
use crate::models::tenant::{
    Tenant, DATABASE_KEY, DB_HOST_KEY, DB_PASSWORD_KEY, DB_USERNAME_KEY,
};

const DEMO_TENANT_IDS: [&str; 3] = ["tenant1", "tenant2", "tenant3"];

/// `tenant1`..`tenant3`, each pointing at its own `<id>_db` on localhost
pub fn demo_tenants() -> Vec<Tenant> {
    DEMO_TENANT_IDS
        .iter()
        .map(|id: &&str| {
            Tenant::new(*id)
                .with_attribute(DATABASE_KEY, format!("{id}_db"))
                .with_attribute(DB_HOST_KEY, "127.0.0.1")
                .with_attribute(DB_USERNAME_KEY, "dev")
                .with_attribute(DB_PASSWORD_KEY, "password")
        })
        .collect()
}

/// Upserts the demo tenants; running it twice leaves the same three records
pub async fn seed_demo_tenants(directory: &dyn TenantDirectory) -> Result<()> {
    let tenants: Vec<Tenant> = demo_tenants();
    directory
        .seed(&tenants)
        .await
        .context("Failed to seed demo tenants")?;

    info!("Demo tenants available: {}", DEMO_TENANT_IDS.join(", "));
    Ok(())
}
