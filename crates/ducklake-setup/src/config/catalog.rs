//! PostgreSQL metadata store configuration for the lakehouse catalog.

use serde::Deserialize;

/// Connection parameters for the catalog's PostgreSQL metadata store.
///
/// Environment variables are prefixed with `POSTGRES_DUCKLAKE_`:
/// - `POSTGRES_DUCKLAKE_USER`: Database user (default: "superset")
/// - `POSTGRES_DUCKLAKE_PASSWORD`: Database password (default: "superset")
/// - `POSTGRES_DUCKLAKE_HOST`: Database host (default: "postgres")
/// - `POSTGRES_DUCKLAKE_PORT`: Database port (default: "5432")
/// - `POSTGRES_DUCKLAKE_DB`: Database name (default: "ducklake_analytics")
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogStoreSettings {
    /// Database user
    #[serde(default = "default_user")]
    pub user: String,

    /// Database password
    #[serde(default = "default_password")]
    pub password: String,

    /// Database host
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: String,

    /// Database name
    #[serde(default = "default_db")]
    pub db: String,
}

fn default_user() -> String {
    "superset".to_string()
}

fn default_password() -> String {
    "superset".to_string()
}

fn default_host() -> String {
    "postgres".to_string()
}

fn default_port() -> String {
    "5432".to_string()
}

fn default_db() -> String {
    "ducklake_analytics".to_string()
}

impl CatalogStoreSettings {
    /// libpq-style key/value connection string consumed by the engine's
    /// postgres extension.
    pub fn connection_string(&self) -> String {
        format!(
            "dbname={} user={} password={} host={} port={}",
            self.db, self.user, self.password, self.host, self.port
        )
    }
}

impl Default for CatalogStoreSettings {
    fn default() -> Self {
        Self {
            user: default_user(),
            password: default_password(),
            host: default_host(),
            port: default_port(),
            db: default_db(),
        }
    }
}
