//! Deployment configuration for the analytics stack.
//!
//! All values come from the process environment, read once into an immutable
//! [`Settings`] value that is passed to each setup step. Tests build the same
//! structure from an explicit variable list via [`Settings::from_iter`]
//! without touching the real environment.

mod bigquery;
mod cache;
mod catalog;
mod storage;

pub use bigquery::BigQuerySettings;
pub use cache::CacheSettings;
pub use catalog::CatalogStoreSettings;
pub use storage::{GcsSettings, S3Settings, StorageDriver, StorageSettings};

use serde::Deserialize;

use crate::error::ConfigError;

/// Treat empty values as absent, the way shell-exported blanks usually are.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Service tokens read without a shared prefix.
#[derive(Debug, Clone, Default, Deserialize)]
struct ServiceTokens {
    motherduck_token: Option<String>,
    google_application_credentials: Option<String>,
}

/// Complete configuration set, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Object storage driver selection and per-backend credentials.
    pub storage: StorageSettings,

    /// PostgreSQL metadata store backing the lakehouse catalog.
    pub catalog_store: CatalogStoreSettings,

    /// Optional BigQuery warehouse federation.
    pub bigquery: BigQuerySettings,

    /// Optional Redis cache/queue backend for the hosting application.
    pub cache: CacheSettings,

    /// MotherDuck service token, when the managed cloud engine is in use.
    pub motherduck_token: Option<String>,

    /// Path to the Google service account file used by BigQuery federation.
    pub google_credentials: Option<String>,
}

impl Settings {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tokens: ServiceTokens = envy::from_env()?;
        Ok(Self {
            storage: StorageSettings::from_env()?,
            catalog_store: envy::prefixed("POSTGRES_DUCKLAKE_").from_env()?,
            bigquery: envy::prefixed("BIGQUERY_").from_env()?,
            cache: envy::prefixed("REDIS_").from_env()?,
            motherduck_token: tokens.motherduck_token,
            google_credentials: tokens.google_application_credentials,
        })
    }

    /// Build configuration from an explicit variable list.
    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let tokens: ServiceTokens = envy::from_iter(vars.clone())?;
        Ok(Self {
            storage: StorageSettings::from_iter(vars.clone())?,
            catalog_store: envy::prefixed("POSTGRES_DUCKLAKE_").from_iter(vars.clone())?,
            bigquery: envy::prefixed("BIGQUERY_").from_iter(vars.clone())?,
            cache: envy::prefixed("REDIS_").from_iter(vars)?,
            motherduck_token: tokens.motherduck_token,
            google_credentials: tokens.google_application_credentials,
        })
    }
}
