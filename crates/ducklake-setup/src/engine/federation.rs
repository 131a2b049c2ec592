//! Read-only warehouse federation (BigQuery).

use std::path::Path;

use duckdb::Connection;

use crate::config::BigQuerySettings;
use crate::engine::sql_literal;
use crate::error::SetupError;

/// Alias for the federated BigQuery project.
pub const BIGQUERY_ALIAS: &str = "bq";

/// ATTACH statement federating the whole project read-only.
fn attach_sql(project_id: &str) -> String {
    format!(
        "ATTACH {} AS {} (TYPE bigquery, READ_ONLY)",
        sql_literal(&format!("project={}", project_id)),
        BIGQUERY_ALIAS,
    )
}

/// Attach the configured BigQuery project under [`BIGQUERY_ALIAS`].
///
/// The service account file must exist on disk; the engine's bigquery
/// extension picks it up through `GOOGLE_APPLICATION_CREDENTIALS` at query
/// time. Returns the number of visible tables when the listing succeeds.
pub fn attach_bigquery(
    conn: &Connection,
    bigquery: &BigQuerySettings,
    credentials: &str,
) -> Result<Option<usize>, SetupError> {
    if !Path::new(credentials).exists() {
        return Err(SetupError::Attachment(format!(
            "Service account file not found at {}",
            credentials
        )));
    }

    conn.execute_batch(&attach_sql(&bigquery.project_id))
        .map_err(|e| {
            SetupError::Attachment(format!(
                "Could not attach BigQuery project '{}': {}",
                bigquery.project_id, e
            ))
        })?;
    tracing::info!(
        project = %bigquery.project_id,
        alias = BIGQUERY_ALIAS,
        "BigQuery project attached"
    );

    // The table listing is informational; the attachment stands without it.
    match count_tables(conn) {
        Ok(count) => Ok(Some(count)),
        Err(e) => {
            tracing::warn!(error = %e, "Could not list federated tables");
            Ok(None)
        }
    }
}

fn count_tables(conn: &Connection) -> Result<usize, duckdb::Error> {
    let mut stmt = conn.prepare("SHOW ALL TABLES")?;
    let mut rows = stmt.query([])?;
    let mut count = 0;
    while rows.next()?.is_some() {
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{connect, MEMORY_DB};

    #[test]
    fn test_attach_sql() {
        assert_eq!(
            attach_sql("analytics-prod"),
            "ATTACH 'project=analytics-prod' AS bq (TYPE bigquery, READ_ONLY)"
        );
    }

    #[test]
    fn test_missing_service_account_file() {
        let conn = connect(MEMORY_DB).unwrap();
        let bigquery = BigQuerySettings {
            enabled: true,
            project_id: "analytics-prod".to_string(),
        };
        let err = attach_bigquery(&conn, &bigquery, "/nonexistent/sa.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sa.json"));
    }

    #[test]
    fn test_count_tables_empty() {
        let conn = connect(MEMORY_DB).unwrap();
        assert_eq!(count_tables(&conn).unwrap(), 0);
    }
}
