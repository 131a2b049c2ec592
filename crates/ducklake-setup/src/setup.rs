//! Setup orchestration and the per-connection state machine.

use std::fmt;

use duckdb::Connection;

use crate::config::Settings;
use crate::engine::catalog::{self, AttachOutcome};
use crate::engine::{extensions, federation, secrets};
use crate::error::SetupError;

/// How far a connection's setup progressed.
///
/// Order is fixed: extensions, then secrets, then catalog attachment, then
/// catalog selection. A failure leaves the connection at the last reached
/// state, degraded but usable for ordinary engine work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionState {
    /// No setup has run.
    Unconfigured,
    /// Capability extensions are installed and loaded.
    ExtensionsLoaded,
    /// Storage secrets are registered.
    SecretsRegistered,
    /// The lakehouse catalog is attached.
    CatalogAttached,
    /// The lakehouse catalog is the active default.
    Active,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Unconfigured => "unconfigured",
            ConnectionState::ExtensionsLoaded => "extensions_loaded",
            ConnectionState::SecretsRegistered => "secrets_registered",
            ConnectionState::CatalogAttached => "catalog_attached",
            ConnectionState::Active => "active",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a setup run: the reached state plus everything that went
/// wrong along the way.
#[derive(Debug)]
pub struct SetupReport {
    /// Last state reached.
    pub state: ConnectionState,

    /// Secret names registered on the engine.
    pub secrets: Vec<&'static str>,

    /// Catalog attach outcome, when attachment was reached.
    pub catalog: Option<AttachOutcome>,

    /// Number of federated warehouse tables visible, when counted.
    pub federated_tables: Option<usize>,

    /// Non-fatal problems, in occurrence order.
    pub warnings: Vec<String>,

    /// First error that stopped progression, if any.
    pub error: Option<SetupError>,
}

impl SetupReport {
    fn new() -> Self {
        Self {
            state: ConnectionState::Unconfigured,
            secrets: Vec::new(),
            catalog: None,
            federated_tables: None,
            warnings: Vec::new(),
            error: None,
        }
    }

    /// True when setup stopped short of an active catalog.
    pub fn is_degraded(&self) -> bool {
        self.state != ConnectionState::Active
    }

    fn capture(&mut self, e: SetupError) {
        self.warnings.push(e.to_string());
        self.error = Some(e);
    }
}

/// One-shot initialization used at deploy time.
///
/// Mandatory extension failures abort with `Err`. Secret registration,
/// federation, and catalog attachment failures leave the engine degraded
/// and are reported through the returned [`SetupReport`], so a
/// misconfigured backend never blocks base startup.
pub fn bootstrap(
    conn: &Connection,
    settings: &Settings,
    data_path: &str,
) -> Result<SetupReport, SetupError> {
    let mut report = SetupReport::new();

    report.warnings.extend(extensions::install_all(conn, settings)?);
    report.state = ConnectionState::ExtensionsLoaded;

    match secrets::register_all(conn, &settings.storage, true) {
        Ok(names) => {
            report.secrets = names;
            report.state = ConnectionState::SecretsRegistered;
        }
        Err(e) => {
            tracing::error!(error = %e, "Secret registration failed");
            report.capture(e);
            return Ok(report);
        }
    }

    if settings.bigquery.enabled {
        attach_federation(conn, settings, &mut report);
    }

    attach_and_select(conn, settings, data_path, catalog::CATALOG_ALIAS, &mut report);
    Ok(report)
}

/// Per-connection setup for engine connections that need the lakehouse
/// catalog, e.g. new connections handed out by a hosting application's
/// pool.
///
/// Never propagates failures: every error, configuration included, is
/// captured in the returned report and the connection stays usable without
/// the external catalog.
pub fn initialize_connection(conn: &Connection, settings: &Settings) -> SetupReport {
    let mut report = SetupReport::new();

    match extensions::install_all(conn, settings) {
        Ok(warnings) => {
            report.warnings.extend(warnings);
            report.state = ConnectionState::ExtensionsLoaded;
        }
        Err(e) => {
            tracing::error!(error = %e, "Connection setup failed loading extensions");
            report.capture(e);
            return report;
        }
    }

    match secrets::register_all(conn, &settings.storage, false) {
        Ok(names) => {
            report.secrets = names;
            report.state = ConnectionState::SecretsRegistered;
        }
        Err(e) => {
            tracing::error!(error = %e, "Connection setup failed registering secrets");
            report.capture(e);
            return report;
        }
    }

    let data_path = match settings.storage.resolve_data_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::error!(error = %e, "Connection setup missing storage configuration");
            report.capture(e.into());
            return report;
        }
    };

    attach_and_select(
        conn,
        settings,
        &data_path,
        catalog::CONNECTION_CATALOG_ALIAS,
        &mut report,
    );
    report
}

fn attach_and_select(
    conn: &Connection,
    settings: &Settings,
    data_path: &str,
    alias: &str,
    report: &mut SetupReport,
) {
    match catalog::attach(conn, &settings.catalog_store, data_path, alias) {
        Ok(outcome) => {
            report.catalog = Some(outcome);
            report.state = ConnectionState::CatalogAttached;
        }
        Err(e) => {
            tracing::error!(error = %e, "Error attaching catalog");
            report.capture(e);
            return;
        }
    }

    match catalog::select_active(conn, alias) {
        Ok(()) => {
            report.state = ConnectionState::Active;
            tracing::info!(alias, "Lakehouse catalog active");
        }
        Err(e) => {
            tracing::error!(error = %e, "Error selecting catalog");
            report.capture(e);
        }
    }
}

fn attach_federation(conn: &Connection, settings: &Settings, report: &mut SetupReport) {
    let credentials = match settings.google_credentials.as_deref() {
        Some(c) if settings.bigquery.is_configured(Some(c)) => c,
        _ => {
            let warning =
                "BigQuery enabled but PROJECT_ID or GOOGLE_APPLICATION_CREDENTIALS not set";
            tracing::warn!("{}", warning);
            report.warnings.push(warning.to_string());
            return;
        }
    };

    match federation::attach_bigquery(conn, &settings.bigquery, credentials) {
        Ok(count) => report.federated_tables = count,
        Err(e) => {
            tracing::warn!(error = %e, "BigQuery federation failed");
            report.warnings.push(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ordering() {
        assert!(ConnectionState::Unconfigured < ConnectionState::ExtensionsLoaded);
        assert!(ConnectionState::ExtensionsLoaded < ConnectionState::SecretsRegistered);
        assert!(ConnectionState::SecretsRegistered < ConnectionState::CatalogAttached);
        assert!(ConnectionState::CatalogAttached < ConnectionState::Active);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Unconfigured.to_string(), "unconfigured");
        assert_eq!(ConnectionState::Active.to_string(), "active");
        assert_eq!(
            ConnectionState::SecretsRegistered.to_string(),
            "secrets_registered"
        );
    }

    #[test]
    fn test_fresh_report_is_degraded() {
        let report = SetupReport::new();
        assert_eq!(report.state, ConnectionState::Unconfigured);
        assert!(report.is_degraded());
        assert!(report.secrets.is_empty());
        assert!(report.error.is_none());
    }

    #[test]
    fn test_capture_keeps_first_error() {
        let mut report = SetupReport::new();
        report.capture(SetupError::Attachment("first".to_string()));
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(report.error, Some(SetupError::Attachment(_))));
    }
}
