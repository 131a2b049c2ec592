//! Error types for lakehouse setup.

use thiserror::Error;

/// Configuration errors detected before any engine interaction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The storage driver selector is not a known backend.
    #[error("Invalid storage driver '{0}'. Use 'gcs' or 's3'.")]
    InvalidDriver(String),

    /// Required variables for the selected backend are absent.
    #[error("{driver} storage driver selected but missing required variables ({})", .missing.join(", "))]
    MissingVariables {
        /// Backend the requirement set belongs to.
        driver: &'static str,
        /// Canonical names of the absent variables.
        missing: Vec<&'static str>,
    },

    /// Environment deserialization failed.
    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<envy::Error> for ConfigError {
    fn from(e: envy::Error) -> Self {
        ConfigError::Environment(e.to_string())
    }
}

/// Errors raised while configuring an engine connection.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration error surfaced during setup.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The engine connection could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A capability extension failed to install or load.
    #[error("Extension '{name}' failed to load: {message}")]
    Extension {
        /// Extension name as known to the engine.
        name: String,
        /// Engine-reported failure.
        message: String,
    },

    /// Secret registration, federation, or catalog attach failed.
    #[error("Attachment error: {0}")]
    Attachment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_driver_display() {
        let err = ConfigError::InvalidDriver("azure".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid storage driver 'azure'. Use 'gcs' or 's3'."
        );
    }

    #[test]
    fn test_missing_variables_display() {
        let err = ConfigError::MissingVariables {
            driver: "GCS",
            missing: vec!["GCS_KEY_ID", "GCS_SECRET", "GCS_BUCKET_PATH"],
        };
        assert_eq!(
            err.to_string(),
            "GCS storage driver selected but missing required variables (GCS_KEY_ID, GCS_SECRET, GCS_BUCKET_PATH)"
        );
    }

    #[test]
    fn test_setup_error_from_config() {
        let err: SetupError = ConfigError::InvalidDriver("ftp".to_string()).into();
        assert!(matches!(err, SetupError::Configuration(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_extension_error_display() {
        let err = SetupError::Extension {
            name: "ducklake".to_string(),
            message: "download failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Extension 'ducklake' failed to load: download failed"
        );
    }
}
