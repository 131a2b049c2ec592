//! Capability extension install/load sequence.

use duckdb::Connection;

use crate::config::Settings;
use crate::error::SetupError;

/// Whether a failed install/load aborts the remaining setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Later steps depend on the module; failure aborts.
    Mandatory,
    /// Failure degrades the connection but setup continues.
    Optional,
}

/// A capability module to install and load.
#[derive(Debug, Clone, Copy)]
pub struct Extension {
    /// Extension name as known to the engine.
    pub name: &'static str,

    /// Non-core repository to install from, if any.
    pub repository: Option<&'static str>,

    /// Failure policy.
    pub requirement: Requirement,
}

/// Remote object storage access; everything after it depends on this.
pub const HTTPFS: Extension = Extension {
    name: "httpfs",
    repository: None,
    requirement: Requirement::Mandatory,
};

/// Relational-source federation; the catalog metadata store speaks postgres.
pub const POSTGRES: Extension = Extension {
    name: "postgres",
    repository: None,
    requirement: Requirement::Mandatory,
};

/// Lakehouse catalog format.
pub const DUCKLAKE: Extension = Extension {
    name: "ducklake",
    repository: None,
    requirement: Requirement::Optional,
};

/// Cloud warehouse federation, community-built.
pub const BIGQUERY: Extension = Extension {
    name: "bigquery",
    repository: Some("community"),
    requirement: Requirement::Optional,
};

/// Managed cloud engine support.
pub const MOTHERDUCK: Extension = Extension {
    name: "motherduck",
    repository: None,
    requirement: Requirement::Optional,
};

impl Extension {
    /// INSTALL/LOAD statement pair for this extension.
    fn install_sql(&self) -> String {
        match self.repository {
            Some(repo) => format!("INSTALL {} FROM {}; LOAD {};", self.name, repo, self.name),
            None => format!("INSTALL {}; LOAD {};", self.name, self.name),
        }
    }

    /// Install and load this extension on the given connection.
    pub fn install(&self, conn: &Connection) -> Result<(), SetupError> {
        conn.execute_batch(&self.install_sql())
            .map_err(|e| SetupError::Extension {
                name: self.name.to_string(),
                message: e.to_string(),
            })
    }
}

/// Install the configured extension sequence in fixed order.
///
/// Mandatory failures abort; optional failures are returned as warnings so
/// the caller can continue with a degraded connection.
pub fn install_all(conn: &Connection, settings: &Settings) -> Result<Vec<String>, SetupError> {
    let mut warnings = Vec::new();

    let has_motherduck_token = settings
        .motherduck_token
        .as_deref()
        .is_some_and(|t| !t.is_empty());
    if has_motherduck_token {
        if let Err(e) = MOTHERDUCK.install(conn) {
            tracing::warn!(error = %e, "Failed to load MotherDuck extension");
            warnings.push(e.to_string());
        }
    }

    for ext in [HTTPFS, POSTGRES, DUCKLAKE] {
        match ext.install(conn) {
            Ok(()) => tracing::debug!(extension = ext.name, "Extension loaded"),
            Err(e) if ext.requirement == Requirement::Mandatory => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Optional extension failed to load");
                warnings.push(e.to_string());
            }
        }
    }

    if settings.bigquery.enabled {
        match BIGQUERY.install(conn) {
            Ok(()) => tracing::info!("BigQuery extension loaded"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load BigQuery extension");
                warnings.push(e.to_string());
            }
        }
    }

    Ok(warnings)
}
