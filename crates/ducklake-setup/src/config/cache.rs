//! Redis cache/queue configuration for the hosting application.

use serde::Deserialize;

/// Redis connection selectors.
///
/// The backend is optional: when `REDIS_HOST` is absent the hosting
/// application falls back to in-process caching and synchronous query
/// execution.
///
/// Environment variables are prefixed with `REDIS_`:
/// - `REDIS_HOST`: Redis host (optional; absence disables the backend)
/// - `REDIS_PORT`: Redis port (default: "6379")
/// - `REDIS_CELERY_DB`: Database index for the task broker (default: "0")
/// - `REDIS_RESULTS_DB`: Database index for task results (default: "1")
/// - `REDIS_CACHE_DB`: Database index for caches (default: "2")
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Redis host; absence disables the backend.
    pub host: Option<String>,

    /// Redis port.
    #[serde(default = "default_port")]
    pub port: String,

    /// Database index for the task broker.
    #[serde(default = "default_celery_db")]
    pub celery_db: String,

    /// Database index for task results.
    #[serde(default = "default_results_db")]
    pub results_db: String,

    /// Database index for caches.
    #[serde(default = "default_cache_db")]
    pub cache_db: String,
}

fn default_port() -> String {
    "6379".to_string()
}

fn default_celery_db() -> String {
    "0".to_string()
}

fn default_results_db() -> String {
    "1".to_string()
}

fn default_cache_db() -> String {
    "2".to_string()
}

impl CacheSettings {
    /// True when a Redis host is configured.
    pub fn is_enabled(&self) -> bool {
        self.host.is_some()
    }

    /// Task broker URL, when the backend is enabled.
    pub fn broker_url(&self) -> Option<String> {
        self.url(&self.celery_db)
    }

    /// Task result backend URL, when the backend is enabled.
    pub fn results_url(&self) -> Option<String> {
        self.url(&self.results_db)
    }

    /// Cache URL, when the backend is enabled.
    pub fn cache_url(&self) -> Option<String> {
        self.url(&self.cache_db)
    }

    fn url(&self, db: &str) -> Option<String> {
        self.host
            .as_ref()
            .map(|host| format!("redis://{}:{}/{}", host, self.port, db))
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            celery_db: default_celery_db(),
            results_db: default_results_db(),
            cache_db: default_cache_db(),
        }
    }
}
