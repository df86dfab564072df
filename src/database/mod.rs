pub mod postgres_service;
pub mod seed;
pub mod tenant_connections;
pub mod tenant_directory;

pub use postgres_service::DatabaseService;
pub use tenant_connections::TenantConnections;
pub use tenant_directory::{InMemoryTenantDirectory, PgTenantDirectory, TenantDirectory};
