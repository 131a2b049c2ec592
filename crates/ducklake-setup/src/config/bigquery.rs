//! BigQuery warehouse federation configuration.

use serde::Deserialize;

/// Optional federation of a BigQuery project as a read-only source.
///
/// Environment variables are prefixed with `BIGQUERY_`:
/// - `BIGQUERY_ENABLED`: Enable federation (default: false)
/// - `BIGQUERY_PROJECT_ID`: Project to attach
///
/// The service account path comes from `GOOGLE_APPLICATION_CREDENTIALS`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BigQuerySettings {
    /// Whether federation is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Project to attach.
    #[serde(default)]
    pub project_id: String,
}

impl BigQuerySettings {
    /// True when federation should be attempted: enabled, with a project id
    /// and a service account file path.
    pub fn is_configured(&self, credentials: Option<&str>) -> bool {
        self.enabled && !self.project_id.is_empty() && credentials.is_some_and(|c| !c.is_empty())
    }
}
