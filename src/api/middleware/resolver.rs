// Tenant identification from request data (header first, then query string)

use std::collections::HashMap;
use std::fmt;

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use tracing::{info, warn};

/// Header carrying the tenant identifier. Matched case-insensitively.
pub const TENANT_ID_HEADER: &str = "X-Tenant-ID";

/// Header values never written to the diagnostic log
const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", "proxy-authorization"];

/// Where a tenant identifier was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Header,
    Query(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Header => write!(f, "header:{TENANT_ID_HEADER}"),
            Provenance::Query(name) => write!(f, "query:{name}"),
        }
    }
}

/// A tenant identifier extracted from a request, with its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTenant {
    pub tenant_id: String,
    pub provenance: Provenance,
}

/// Produces an optional tenant identifier for an inbound request.
/// Only headers and the query string may be consulted.
pub trait TenantResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> Option<ResolvedTenant>;
}

/// `X-Tenant-ID` header, falling back to a configurable query parameter
#[derive(Debug, Clone)]
pub struct RequestDataResolver {
    query_parameter: String,
}

impl RequestDataResolver {
    pub fn new(query_parameter: impl Into<String>) -> Self {
        Self {
            query_parameter: query_parameter.into(),
        }
    }

    fn from_header(headers: &HeaderMap) -> Option<String> {
        headers
            .iter()
            .filter(|(name, _)| name.as_str().eq_ignore_ascii_case(TENANT_ID_HEADER))
            .filter_map(|(_, value)| value.to_str().ok())
            .map(str::trim)
            .find(|value: &&str| !value.is_empty())
            .map(str::to_owned)
    }

    fn from_query(&self, query: &HashMap<String, String>) -> Option<String> {
        query
            .get(&self.query_parameter)
            .map(|value: &String| value.trim())
            .filter(|value: &&str| !value.is_empty())
            .map(str::to_owned)
    }
}

impl TenantResolver for RequestDataResolver {
    fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> Option<ResolvedTenant> {
        if let Some(tenant_id) = Self::from_header(headers) {
            let resolved: ResolvedTenant = ResolvedTenant {
                tenant_id,
                provenance: Provenance::Header,
            };
            info!(tenant_id = %resolved.tenant_id, source = %resolved.provenance, "Tenant identified");
            return Some(resolved);
        }

        let pairs: Vec<(String, String)> = query_pairs(uri);
        let query: HashMap<String, String> = pairs.iter().cloned().collect();

        if let Some(tenant_id) = self.from_query(&query) {
            let resolved: ResolvedTenant = ResolvedTenant {
                tenant_id,
                provenance: Provenance::Query(self.query_parameter.clone()),
            };
            info!(tenant_id = %resolved.tenant_id, source = %resolved.provenance, "Tenant identified");
            return Some(resolved);
        }

        warn!(
            headers = ?loggable_headers(headers),
            query = ?pairs,
            "No tenant found in request"
        );
        None
    }
}

/// Query string as ordered pairs; a malformed query string yields none
fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default()
}

fn loggable_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown: String = if REDACTED_HEADERS.contains(&name.as_str()) {
                "[redacted]".to_owned()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name.as_str().to_owned(), shown)
        })
        .collect()
}
