// Tenant records as stored in the central directory

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::environment::EnvironmentVariables;

/// Attribute keys carrying a tenant's connection parameters
pub const DATABASE_KEY: &str = "database";
pub const DB_HOST_KEY: &str = "db_host";
pub const DB_PORT_KEY: &str = "db_port";
pub const DB_USERNAME_KEY: &str = "db_username";
pub const DB_PASSWORD_KEY: &str = "db_password";

/// A customer with its own isolated database.
///
/// `data` is an open attribute bag: connection parameters live next to any
/// other metadata the tenant carries.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Tenant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Map::new(),
        }
    }

    /// Sets one attribute, replacing any previous value
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn string_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key)
            .and_then(Value::as_str)
            .filter(|value: &&str| !value.is_empty())
    }

    /// Name of the tenant's own database
    pub fn database(&self) -> Option<&str> {
        self.string_attribute(DATABASE_KEY)
    }

    /// Resolves the parameters used to reach this tenant's database.
    /// Host, port and credentials fall back to the central connection settings;
    /// the database name has no fallback.
    pub fn connection_params(
        &self,
        defaults: &EnvironmentVariables,
    ) -> Result<TenantConnectionParams, MissingDatabase> {
        let database: &str = self.database().ok_or_else(|| MissingDatabase {
            tenant_id: self.id.clone(),
        })?;

        // Seeders write the port either as a number or as a string
        let port: u16 = match self.attribute(DB_PORT_KEY) {
            Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
        .unwrap_or(defaults.db_port);

        Ok(TenantConnectionParams {
            tenant_id: self.id.clone(),
            host: self.string_attribute(DB_HOST_KEY).unwrap_or(&*defaults.db_host).to_owned(),
            port,
            username: self
                .string_attribute(DB_USERNAME_KEY)
                .unwrap_or(&*defaults.db_user)
                .to_owned(),
            password: self
                .string_attribute(DB_PASSWORD_KEY)
                .unwrap_or(&*defaults.db_password)
                .to_owned(),
            database: database.to_owned(),
        })
    }
}

impl std::fmt::Debug for Tenant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut data: Map<String, Value> = self.data.clone();
        if let Some(password) = data.get_mut(DB_PASSWORD_KEY) {
            *password = Value::String("********".to_owned());
        }

        f.debug_struct("Tenant")
            .field("id", &self.id)
            .field("data", &data)
            .finish()
    }
}

/// Everything needed to open a pool against one tenant's database
#[derive(Clone, PartialEq, Eq)]
pub struct TenantConnectionParams {
    pub tenant_id: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for TenantConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantConnectionParams")
            .field("tenant_id", &self.tenant_id)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("tenant '{tenant_id}' has no '{key}' attribute", key = DATABASE_KEY)]
pub struct MissingDatabase {
    pub tenant_id: String,
}
