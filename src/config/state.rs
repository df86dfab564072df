// Application state shared by every route and middleware

use std::sync::Arc;

use crate::api::middleware::resolver::{RequestDataResolver, TenantResolver};
use crate::api::middleware::tenant::TenancyInitializer;
use crate::config::environment::EnvironmentVariables;
use crate::database::{TenantConnections, TenantDirectory};

/// Built once at startup and cloned into each request. Nothing tenant
/// specific lives here: the active tenant is carried by the request itself.
#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub directory: Arc<dyn TenantDirectory>,
    pub resolver: Arc<dyn TenantResolver>,
    pub tenancy: TenancyInitializer,
}

impl AppState {
    pub fn new(
        environment: Arc<EnvironmentVariables>,
        directory: Arc<dyn TenantDirectory>,
        connections: TenantConnections,
    ) -> Self {
        let resolver: Arc<dyn TenantResolver> = Arc::new(RequestDataResolver::new(
            environment.tenant_query_parameter.to_string(),
        ));
        let tenancy: TenancyInitializer =
            TenancyInitializer::new(directory.clone(), connections, environment.clone());

        Self {
            environment,
            directory,
            resolver,
            tenancy,
        }
    }

}
