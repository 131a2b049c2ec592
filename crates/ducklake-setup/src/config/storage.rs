//! Object storage driver selection and credentials.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::non_empty;
use crate::error::ConfigError;

/// Selector for the object storage backend backing the lakehouse data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDriver {
    /// Google Cloud Storage.
    Gcs,
    /// Amazon S3 or an S3-compatible endpoint (MinIO and friends).
    S3,
}

impl FromStr for StorageDriver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcs" => Ok(StorageDriver::Gcs),
            "s3" => Ok(StorageDriver::S3),
            other => Err(ConfigError::InvalidDriver(other.to_string())),
        }
    }
}

impl fmt::Display for StorageDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageDriver::Gcs => write!(f, "gcs"),
            StorageDriver::S3 => write!(f, "s3"),
        }
    }
}

/// Driver selector read under the `DUCKLAKE_` prefix.
#[derive(Debug, Clone, Deserialize)]
struct DriverSelector {
    #[serde(default = "default_driver")]
    storage_driver: String,
}

fn default_driver() -> String {
    "gcs".to_string()
}

/// Google Cloud Storage credentials (HMAC interoperability keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GcsSettings {
    /// HMAC key identifier.
    pub key_id: Option<String>,

    /// HMAC secret.
    pub secret: Option<String>,

    /// Bucket path for lakehouse data (gs://...).
    pub bucket_path: Option<String>,

    /// Legacy name for the bucket path, still honored.
    pub data_path: Option<String>,
}

impl GcsSettings {
    /// Bucket path, accepting the legacy `GCS_DATA_PATH` name.
    pub fn bucket_path(&self) -> Option<&str> {
        non_empty(&self.bucket_path).or_else(|| non_empty(&self.data_path))
    }

    /// True when the credential pair needed for a secret is present.
    pub fn has_credentials(&self) -> bool {
        non_empty(&self.key_id).is_some() && non_empty(&self.secret).is_some()
    }
}

/// S3 / MinIO credentials and addressing options.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Settings {
    /// Access key.
    pub access_key_id: Option<String>,

    /// Secret key.
    pub secret_access_key: Option<String>,

    /// Bucket path for lakehouse data (s3://...).
    pub bucket_path: Option<String>,

    /// Custom endpoint for S3-compatible object stores.
    pub endpoint: Option<String>,

    /// Region.
    #[serde(default = "default_region")]
    pub region: String,

    /// URL addressing style ("path" or "vhost").
    #[serde(default = "default_url_style")]
    pub url_style: String,

    /// Whether to use TLS when talking to the endpoint.
    #[serde(default = "default_use_ssl")]
    pub use_ssl: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_url_style() -> String {
    "path".to_string()
}

fn default_use_ssl() -> bool {
    true
}

impl S3Settings {
    /// True when the credential pair needed for a secret is present.
    pub fn has_credentials(&self) -> bool {
        non_empty(&self.access_key_id).is_some() && non_empty(&self.secret_access_key).is_some()
    }
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            bucket_path: None,
            endpoint: None,
            region: default_region(),
            url_style: default_url_style(),
            use_ssl: default_use_ssl(),
        }
    }
}

/// Combined storage configuration: the driver selector plus both backends'
/// credential sets.
///
/// Backends other than the selected driver may still carry credentials;
/// their secrets are registered too so mixed-source setups can query both.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Selected primary driver.
    pub driver: StorageDriver,

    /// GCS credentials.
    pub gcs: GcsSettings,

    /// S3 credentials.
    pub s3: S3Settings,
}

impl StorageSettings {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        let selector: DriverSelector = envy::prefixed("DUCKLAKE_").from_env()?;
        Ok(Self {
            driver: selector.storage_driver.parse()?,
            gcs: envy::prefixed("GCS_").from_env()?,
            s3: envy::prefixed("S3_").from_env()?,
        })
    }

    pub(crate) fn from_iter(vars: Vec<(String, String)>) -> Result<Self, ConfigError> {
        let selector: DriverSelector = envy::prefixed("DUCKLAKE_").from_iter(vars.clone())?;
        Ok(Self {
            driver: selector.storage_driver.parse()?,
            gcs: envy::prefixed("GCS_").from_iter(vars.clone())?,
            s3: envy::prefixed("S3_").from_iter(vars)?,
        })
    }

    /// Resolve the lakehouse data path for the selected driver.
    ///
    /// Fails with [`ConfigError::MissingVariables`] naming every absent
    /// required variable for that backend.
    pub fn resolve_data_path(&self) -> Result<String, ConfigError> {
        match self.driver {
            StorageDriver::Gcs => {
                let mut missing = Vec::new();
                if non_empty(&self.gcs.key_id).is_none() {
                    missing.push("GCS_KEY_ID");
                }
                if non_empty(&self.gcs.secret).is_none() {
                    missing.push("GCS_SECRET");
                }
                if self.gcs.bucket_path().is_none() {
                    missing.push("GCS_BUCKET_PATH");
                }
                match self.gcs.bucket_path() {
                    Some(path) if missing.is_empty() => Ok(path.to_string()),
                    _ => Err(ConfigError::MissingVariables {
                        driver: "GCS",
                        missing,
                    }),
                }
            }
            StorageDriver::S3 => {
                let mut missing = Vec::new();
                if non_empty(&self.s3.access_key_id).is_none() {
                    missing.push("S3_ACCESS_KEY_ID");
                }
                if non_empty(&self.s3.secret_access_key).is_none() {
                    missing.push("S3_SECRET_ACCESS_KEY");
                }
                if non_empty(&self.s3.bucket_path).is_none() {
                    missing.push("S3_BUCKET_PATH");
                }
                match non_empty(&self.s3.bucket_path) {
                    Some(path) if missing.is_empty() => Ok(path.to_string()),
                    _ => Err(ConfigError::MissingVariables {
                        driver: "S3",
                        missing,
                    }),
                }
            }
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            driver: StorageDriver::Gcs,
            gcs: GcsSettings::default(),
            s3: S3Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gcs(key_id: Option<&str>, secret: Option<&str>, bucket: Option<&str>) -> GcsSettings {
        GcsSettings {
            key_id: key_id.map(String::from),
            secret: secret.map(String::from),
            bucket_path: bucket.map(String::from),
            data_path: None,
        }
    }

    #[test]
    fn test_driver_from_str() {
        assert_eq!("gcs".parse::<StorageDriver>().unwrap(), StorageDriver::Gcs);
        assert_eq!("S3".parse::<StorageDriver>().unwrap(), StorageDriver::S3);
        assert_eq!("GCS".parse::<StorageDriver>().unwrap(), StorageDriver::Gcs);
    }

    #[test]
    fn test_driver_from_str_invalid() {
        let err = "azure".parse::<StorageDriver>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDriver(ref d) if d == "azure"));
    }

    #[test]
    fn test_resolve_gcs_all_missing() {
        let settings = StorageSettings::default();
        let err = settings.resolve_data_path().unwrap_err();
        assert_eq!(
            err.to_string(),
            "GCS storage driver selected but missing required variables (GCS_KEY_ID, GCS_SECRET, GCS_BUCKET_PATH)"
        );
    }

    #[test]
    fn test_resolve_gcs_partial_missing() {
        let settings = StorageSettings {
            driver: StorageDriver::Gcs,
            gcs: gcs(Some("key"), None, Some("gs://lake")),
            s3: S3Settings::default(),
        };
        let err = settings.resolve_data_path().unwrap_err();
        match err {
            ConfigError::MissingVariables { driver, missing } => {
                assert_eq!(driver, "GCS");
                assert_eq!(missing, vec!["GCS_SECRET"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolve_gcs_ok() {
        let settings = StorageSettings {
            driver: StorageDriver::Gcs,
            gcs: gcs(Some("key"), Some("secret"), Some("gs://lake/data")),
            s3: S3Settings::default(),
        };
        assert_eq!(settings.resolve_data_path().unwrap(), "gs://lake/data");
    }

    #[test]
    fn test_resolve_gcs_legacy_data_path() {
        let settings = StorageSettings {
            driver: StorageDriver::Gcs,
            gcs: GcsSettings {
                key_id: Some("key".to_string()),
                secret: Some("secret".to_string()),
                bucket_path: None,
                data_path: Some("gs://legacy/data".to_string()),
            },
            s3: S3Settings::default(),
        };
        assert_eq!(settings.resolve_data_path().unwrap(), "gs://legacy/data");
    }

    #[test]
    fn test_resolve_s3_missing_names_requirements() {
        let settings = StorageSettings {
            driver: StorageDriver::S3,
            gcs: GcsSettings::default(),
            s3: S3Settings {
                access_key_id: Some("ak".to_string()),
                ..S3Settings::default()
            },
        };
        let err = settings.resolve_data_path().unwrap_err();
        match err {
            ConfigError::MissingVariables { driver, missing } => {
                assert_eq!(driver, "S3");
                assert_eq!(missing, vec!["S3_SECRET_ACCESS_KEY", "S3_BUCKET_PATH"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolve_s3_ok() {
        let settings = StorageSettings {
            driver: StorageDriver::S3,
            gcs: GcsSettings::default(),
            s3: S3Settings {
                access_key_id: Some("ak".to_string()),
                secret_access_key: Some("sk".to_string()),
                bucket_path: Some("s3://lake/data".to_string()),
                ..S3Settings::default()
            },
        };
        assert_eq!(settings.resolve_data_path().unwrap(), "s3://lake/data");
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let settings = StorageSettings {
            driver: StorageDriver::Gcs,
            gcs: gcs(Some(""), Some("secret"), Some("gs://lake")),
            s3: S3Settings::default(),
        };
        let err = settings.resolve_data_path().unwrap_err();
        match err {
            ConfigError::MissingVariables { missing, .. } => {
                assert_eq!(missing, vec!["GCS_KEY_ID"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_s3_defaults() {
        let s3 = S3Settings::default();
        assert_eq!(s3.region, "us-east-1");
        assert_eq!(s3.url_style, "path");
        assert!(s3.use_ssl);
        assert!(!s3.has_credentials());
    }
}
