// Tenancy initialization: binds a request to its tenant's database

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

use crate::api::middleware::resolver::{Provenance, ResolvedTenant};
use crate::config::environment::EnvironmentVariables;
use crate::config::state::AppState;
use crate::database::{TenantConnections, TenantDirectory};
use crate::models::tenant::{MissingDatabase, Tenant, TenantConnectionParams};
use crate::utils::response_handler::HandlerResponse;

/// `attempted_tenant` value when no identifier was found at all
pub const NO_TENANT: &str = "none";

/// Error code shared by both client-side identification failures
pub const TENANT_NOT_FOUND_CODE: &str = "tenant_not_found";

/// The tenant database a request is bound to
#[derive(Debug, Clone)]
pub struct TenantDatabase {
    pub name: String,
    pub pool: PgPool,
}

/// Tenant context stored in request extensions.
/// It lives exactly as long as the request: dropping it is what puts the
/// request back on the central connection.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant: Tenant,
    pub provenance: Provenance,
    pub database: TenantDatabase,
}

impl TenantContext {
    pub fn tenant_id(&self) -> &str {
        &self.tenant.id
    }
}

// =============================================================================
// PHASES
// =============================================================================

/// Lifecycle of tenancy initialization within one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenancyPhase {
    Uninitialized,
    Resolving,
    Active,
    Failed,
}

impl TenancyPhase {
    pub fn can_transition_to(self, next: TenancyPhase) -> bool {
        matches!(
            (self, next),
            (TenancyPhase::Uninitialized, TenancyPhase::Resolving)
                | (TenancyPhase::Resolving, TenancyPhase::Active)
                | (TenancyPhase::Resolving, TenancyPhase::Failed)
        )
    }

    #[cfg(test)]
    pub fn is_terminal(self) -> bool {
        matches!(self, TenancyPhase::Active | TenancyPhase::Failed)
    }

    fn advance(&mut self, next: TenancyPhase) {
        debug_assert!(self.can_transition_to(next), "invalid tenancy transition {self} -> {next}");
        debug!("Tenancy phase {} -> {}", self, next);
        *self = next;
    }
}

impl fmt::Display for TenancyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            TenancyPhase::Uninitialized => "uninitialized",
            TenancyPhase::Resolving => "resolving",
            TenancyPhase::Active => "active",
            TenancyPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
    /// No identifier in the header or query string
    #[error("Tenant could not be identified")]
    NotIdentified,

    /// Identifier present but unknown to the directory
    #[error("Tenant could not be identified with id '{tenant_id}'")]
    NotFound { tenant_id: String },

    /// The tenant record cannot name a database
    #[error(transparent)]
    Connection(#[from] MissingDatabase),

    /// The central directory could not be queried
    #[error("Tenant directory lookup failed for '{tenant_id}'")]
    Directory {
        tenant_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl TenancyError {
    /// The raw identifier the client submitted, or `"none"`
    pub fn attempted_tenant(&self) -> &str {
        match self {
            TenancyError::NotIdentified => NO_TENANT,
            TenancyError::NotFound { tenant_id } | TenancyError::Directory { tenant_id, .. } => tenant_id,
            TenancyError::Connection(missing) => &missing.tenant_id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TenancyError::NotIdentified | TenancyError::NotFound { .. } => StatusCode::NOT_FOUND,
            TenancyError::Connection(_) | TenancyError::Directory { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TenancyError {
    fn into_response(self) -> Response {
        let response: HandlerResponse = match &self {
            TenancyError::NotIdentified | TenancyError::NotFound { .. } => {
                HandlerResponse::new(self.status_code()).data(json!({
                    "error": TENANT_NOT_FOUND_CODE,
                    "message": self.to_string(),
                    "attempted_tenant": self.attempted_tenant(),
                }))
            }
            TenancyError::Connection(_) => HandlerResponse::error(
                self.status_code(),
                "tenant_connection_failed",
                "Tenant database is not configured",
            ),
            TenancyError::Directory { .. } => HandlerResponse::error(
                self.status_code(),
                "tenant_directory_unavailable",
                "Tenant directory is unavailable",
            ),
        };

        response.into_response()
    }
}

// =============================================================================
// INITIALIZER
// =============================================================================

/// Looks a resolved identifier up and activates that tenant's database
#[derive(Clone, Debug)]
pub struct TenancyInitializer {
    directory: Arc<dyn TenantDirectory>,
    connections: TenantConnections,
    config: Arc<EnvironmentVariables>,
}

impl TenancyInitializer {
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        connections: TenantConnections,
        config: Arc<EnvironmentVariables>,
    ) -> Self {
        Self {
            directory,
            connections,
            config,
        }
    }

    pub async fn initialize(
        &self,
        resolved: Option<ResolvedTenant>,
    ) -> Result<TenantContext, TenancyError> {
        let ResolvedTenant {
            tenant_id,
            provenance,
        } = resolved.ok_or(TenancyError::NotIdentified)?;

        let tenant: Tenant = match self.directory.find(&tenant_id).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => return Err(TenancyError::NotFound { tenant_id }),
            Err(source) => return Err(TenancyError::Directory { tenant_id, source }),
        };

        let params: TenantConnectionParams = tenant.connection_params(&self.config)?;
        let pool: PgPool = self.connections.pool_for(&params).await;

        Ok(TenantContext {
            tenant,
            provenance,
            database: TenantDatabase {
                name: params.database,
                pool,
            },
        })
    }
}

/// Route layer for tenant-scoped routes: resolves the tenant, activates its
/// database and exposes a `TenantContext` to the handler. Failures
/// short-circuit the handler chain.
#[instrument(name = "tenancy", skip_all, fields(path = %request.uri().path()))]
pub async fn initialize_tenancy(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, TenancyError> {
    let mut phase: TenancyPhase = TenancyPhase::Uninitialized;
    phase.advance(TenancyPhase::Resolving);

    let resolved: Option<ResolvedTenant> = state.resolver.resolve(request.headers(), request.uri());

    match state.tenancy.initialize(resolved).await {
        Ok(context) => {
            phase.advance(TenancyPhase::Active);
            debug!(
                tenant_id = %context.tenant_id(),
                database = %context.database.name,
                "Tenant database activated"
            );
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(err) => {
            phase.advance(TenancyPhase::Failed);
            match &err {
                TenancyError::Directory { source, .. } => {
                    error!(attempted_tenant = %err.attempted_tenant(), "{}: {:#}", err, source);
                }
                TenancyError::Connection(_) => {
                    error!(attempted_tenant = %err.attempted_tenant(), "Tenancy initialization failed: {}", err);
                }
                TenancyError::NotIdentified | TenancyError::NotFound { .. } => {
                    warn!(attempted_tenant = %err.attempted_tenant(), "{}", err);
                }
            }
            Err(err)
        }
    }
}
