// Start of file: /src/config/environment.rs

// * Environment configuration, read once at startup and shared through AppState.

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{bail, Context, Result};
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "postgres";
const DEFAULT_DB_NAME: &str = "central";
const DEFAULT_TENANT_QUERY_PARAMETER: &str = "tenant";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 3; // 3 seconds
const DEFAULT_DB_PORT: u16 = 5432; // Default Postgres port

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    // * Central database: holds the tenant directory
    pub db_host: Cow<'static, str>,
    pub db_port: u16,
    pub db_user: Cow<'static, str>,
    pub db_password: Cow<'static, str>,
    pub db_name: Cow<'static, str>,
    // * Name of the query parameter used as a fallback for X-Tenant-ID
    pub tenant_query_parameter: Cow<'static, str>,
    pub seed_demo_tenants: bool,
}

impl EnvironmentVariables {
    // * Loads environment variables from the process (and .env).
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        let config: EnvironmentVariables = Self::from_vars(&vars)?;

        if cfg!(debug_assertions) {
            tracing::debug!("Loaded environment configuration: {:#?}", config.redacted());
        }

        Ok(config)
    }

    // * Builds the configuration from an already collected variable map,
    // * providing defaults if missing.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| vars.get(key).map(String::as_str);

        let tenant_query_parameter: Cow<'static, str> = match get_var("TENANT_QUERY_PARAMETER") {
            Some(name) if name.trim().is_empty() => bail!("TENANT_QUERY_PARAMETER cannot be empty"),
            Some(name) => Cow::Owned(name.trim().to_owned()),
            None => Cow::Borrowed(DEFAULT_TENANT_QUERY_PARAMETER),
        };

        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            db_host: get_var("DB_HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_HOST, defaulting to '{DEFAULT_DB_HOST}'");
                    Cow::Borrowed(DEFAULT_DB_HOST)
                }),

            db_port: get_var("DB_PORT")
                .map(|s| s.parse().context("Invalid DB_PORT"))
                .transpose()?
                .unwrap_or(DEFAULT_DB_PORT),

            db_user: get_var("DB_USER")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_USER, defaulting to '{DEFAULT_DB_USER}'");
                    Cow::Borrowed(DEFAULT_DB_USER)
                }),

            db_password: get_var("DB_PASSWORD")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_PASSWORD, defaulting to '{DEFAULT_DB_PASSWORD}'");
                    Cow::Borrowed(DEFAULT_DB_PASSWORD)
                }),

            db_name: get_var("DB_NAME")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing DB_NAME, defaulting to '{DEFAULT_DB_NAME}'");
                    Cow::Borrowed(DEFAULT_DB_NAME)
                }),

            tenant_query_parameter,

            seed_demo_tenants: get_var("SEED_DEMO_TENANTS")
                .map(|s| s.parse().context("Invalid SEED_DEMO_TENANTS (expected true or false)"))
                .transpose()?
                .unwrap_or(false),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    // * Copy safe to print in logs
    fn redacted(&self) -> Self {
        Self {
            db_password: Cow::Borrowed("********"),
            ..self.clone()
        }
    }
}


// End of file: /src/config/environment.rs
