//! Lakehouse catalog attachment.

use duckdb::Connection;

use crate::config::CatalogStoreSettings;
use crate::engine::sql_literal;
use crate::error::SetupError;

/// Catalog alias used by the one-shot initializer.
pub const CATALOG_ALIAS: &str = "ducklake";

/// Catalog alias used for per-connection setup inside the hosting
/// application.
pub const CONNECTION_CATALOG_ALIAS: &str = "ducklake_analytics";

/// Result of an attach request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The catalog was attached by this call.
    Attached,
    /// The alias was already registered; nothing was done.
    AlreadyAttached,
}

/// Whether a database with the given alias is registered on the connection.
pub fn catalog_exists(conn: &Connection, alias: &str) -> Result<bool, SetupError> {
    let mut stmt = conn
        .prepare("SELECT database_name FROM duckdb_databases() WHERE database_name = ?")
        .map_err(|e| introspection_err(alias, e))?;
    let mut rows = stmt.query([alias]).map_err(|e| introspection_err(alias, e))?;
    let exists = rows.next().map_err(|e| introspection_err(alias, e))?.is_some();
    Ok(exists)
}

fn introspection_err(alias: &str, e: duckdb::Error) -> SetupError {
    SetupError::Attachment(format!("Failed to inspect catalog '{}': {}", alias, e))
}

/// ATTACH statement binding the metadata store and data path under `alias`.
fn attach_sql(store: &CatalogStoreSettings, data_path: &str, alias: &str) -> String {
    format!(
        "ATTACH {} AS {} (DATA_PATH {})",
        sql_literal(&format!("ducklake:postgres:{}", store.connection_string())),
        alias,
        sql_literal(data_path),
    )
}

/// Attach the lakehouse catalog unless the alias is already registered.
///
/// Attachment is idempotent across re-runs and new connections: an existing
/// alias short-circuits to [`AttachOutcome::AlreadyAttached`] without
/// touching the engine.
pub fn attach(
    conn: &Connection,
    store: &CatalogStoreSettings,
    data_path: &str,
    alias: &str,
) -> Result<AttachOutcome, SetupError> {
    if catalog_exists(conn, alias)? {
        tracing::info!(alias, "Catalog already attached");
        return Ok(AttachOutcome::AlreadyAttached);
    }

    conn.execute_batch(&attach_sql(store, data_path, alias))
        .map_err(|e| {
            SetupError::Attachment(format!("Failed to attach catalog '{}': {}", alias, e))
        })?;
    tracing::info!(alias, data_path, "Catalog attached");
    Ok(AttachOutcome::Attached)
}

/// Select the catalog as the active default for subsequent statements.
pub fn select_active(conn: &Connection, alias: &str) -> Result<(), SetupError> {
    conn.execute_batch(&format!("USE {}", alias)).map_err(|e| {
        SetupError::Attachment(format!("Failed to select catalog '{}': {}", alias, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{connect, MEMORY_DB};

    fn store() -> CatalogStoreSettings {
        CatalogStoreSettings {
            user: "lake".to_string(),
            password: "secret".to_string(),
            host: "db.internal".to_string(),
            port: "5432".to_string(),
            db: "catalog".to_string(),
        }
    }

    #[test]
    fn test_attach_sql() {
        let sql = attach_sql(&store(), "s3://lake/data", CATALOG_ALIAS);
        assert_eq!(
            sql,
            "ATTACH 'ducklake:postgres:dbname=catalog user=lake password=secret \
             host=db.internal port=5432' AS ducklake (DATA_PATH 's3://lake/data')"
        );
    }

    #[test]
    fn test_catalog_exists_fresh_connection() {
        let conn = connect(MEMORY_DB).unwrap();
        assert!(!catalog_exists(&conn, CATALOG_ALIAS).unwrap());
    }

    #[test]
    fn test_attach_is_idempotent() {
        let conn = connect(MEMORY_DB).unwrap();
        // Simulate an earlier attachment under the fixed alias.
        conn.execute_batch("ATTACH ':memory:' AS ducklake").unwrap();

        let outcome = attach(&conn, &store(), "s3://lake/data", CATALOG_ALIAS).unwrap();
        assert_eq!(outcome, AttachOutcome::AlreadyAttached);

        let outcome = attach(&conn, &store(), "s3://lake/data", CATALOG_ALIAS).unwrap();
        assert_eq!(outcome, AttachOutcome::AlreadyAttached);

        // Still exactly one entry under the alias.
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM duckdb_databases() WHERE database_name = ?",
                [CATALOG_ALIAS],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_select_active() {
        let conn = connect(MEMORY_DB).unwrap();
        conn.execute_batch("ATTACH ':memory:' AS ducklake_analytics")
            .unwrap();
        select_active(&conn, CONNECTION_CATALOG_ALIAS).unwrap();

        let current: String = conn
            .query_row("SELECT current_catalog()", [], |row| row.get(0))
            .unwrap();
        assert_eq!(current, CONNECTION_CATALOG_ALIAS);
    }

    #[test]
    fn test_select_active_unknown_alias() {
        let conn = connect(MEMORY_DB).unwrap();
        let err = select_active(&conn, "missing").unwrap_err();
        assert!(matches!(err, SetupError::Attachment(_)));
    }
}
