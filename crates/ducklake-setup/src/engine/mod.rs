//! DuckDB engine operations for lakehouse setup.
//!
//! Each submodule wraps one slice of the engine command surface: extension
//! install/load, secret registration, catalog attachment, warehouse
//! federation. Every operation is a single attempt; callers decide whether
//! a failure is fatal or leaves the connection degraded.

pub mod catalog;
pub mod extensions;
pub mod federation;
pub mod secrets;

use duckdb::{Config, Connection};

use crate::error::SetupError;

/// In-memory database path.
pub const MEMORY_DB: &str = ":memory:";

/// Open an engine connection with unsigned extensions allowed.
///
/// [`MEMORY_DB`] opens an ephemeral database; anything else is a file path.
pub fn connect(db_path: &str) -> Result<Connection, SetupError> {
    let config = Config::default()
        .allow_unsigned_extensions()
        .map_err(|e| SetupError::Connection(format!("Failed to build engine config: {}", e)))?;

    let conn = if db_path == MEMORY_DB {
        Connection::open_in_memory_with_flags(config)
    } else {
        Connection::open_with_flags(db_path, config)
    }
    .map_err(|e| SetupError::Connection(format!("Failed to open database '{}': {}", db_path, e)))?;

    Ok(conn)
}

/// Quote a string as a SQL literal, doubling embedded single quotes.
///
/// The engine does not parameterize DDL (CREATE SECRET, ATTACH), so
/// credential and path values are embedded directly.
pub(crate) fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
