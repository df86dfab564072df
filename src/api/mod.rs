// HTTP surface: route groups and the tenancy middleware

pub mod fallback;
pub mod health;
pub mod middleware;
pub mod tenant_info;
pub mod tenants;
