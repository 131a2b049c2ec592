//! Engine-level secret registration for object storage backends.
//!
//! Registration is always drop-then-create: re-running with rotated
//! credentials replaces the stored secret wholesale. There is no partial
//! update and no versioning.

use duckdb::Connection;

use crate::config::{non_empty, GcsSettings, S3Settings, StorageSettings};
use crate::engine::sql_literal;
use crate::error::SetupError;

/// Fixed secret name for the GCS backend.
pub const GCS_SECRET_NAME: &str = "gcs_secret";

/// Fixed secret name for the S3 backend.
pub const S3_SECRET_NAME: &str = "s3_secret";

fn create_keyword(persistent: bool) -> &'static str {
    if persistent {
        "CREATE PERSISTENT SECRET"
    } else {
        "CREATE SECRET"
    }
}

/// CREATE SECRET statement for GCS, when the credential pair is present.
pub fn gcs_secret_sql(gcs: &GcsSettings, persistent: bool) -> Option<String> {
    let key_id = non_empty(&gcs.key_id)?;
    let secret = non_empty(&gcs.secret)?;
    Some(format!(
        "{} {} (TYPE GCS, KEY_ID {}, SECRET {})",
        create_keyword(persistent),
        GCS_SECRET_NAME,
        sql_literal(key_id),
        sql_literal(secret),
    ))
}

/// CREATE SECRET statement for S3, when the credential pair is present.
pub fn s3_secret_sql(s3: &S3Settings, persistent: bool) -> Option<String> {
    let access_key = non_empty(&s3.access_key_id)?;
    let secret_key = non_empty(&s3.secret_access_key)?;

    let mut params = vec![
        "TYPE S3".to_string(),
        format!("KEY_ID {}", sql_literal(access_key)),
        format!("SECRET {}", sql_literal(secret_key)),
        format!("REGION {}", sql_literal(&s3.region)),
        format!("URL_STYLE {}", sql_literal(&s3.url_style)),
        format!("USE_SSL {}", s3.use_ssl),
    ];
    if let Some(endpoint) = non_empty(&s3.endpoint) {
        params.push(format!("ENDPOINT {}", sql_literal(endpoint)));
    }

    Some(format!(
        "{} {} ({})",
        create_keyword(persistent),
        S3_SECRET_NAME,
        params.join(", ")
    ))
}

fn register(conn: &Connection, name: &str, create_sql: &str) -> Result<(), SetupError> {
    conn.execute_batch(&format!("DROP SECRET IF EXISTS {}", name))
        .map_err(|e| SetupError::Attachment(format!("Failed to drop secret '{}': {}", name, e)))?;
    conn.execute_batch(create_sql)
        .map_err(|e| SetupError::Attachment(format!("Failed to create secret '{}': {}", name, e)))
}

/// Register a secret for every backend whose full credential set is present.
///
/// Both backends may be registered regardless of the selected primary
/// driver; mixed-source setups query the non-primary backend too. Returns
/// the names registered.
pub fn register_all(
    conn: &Connection,
    storage: &StorageSettings,
    persistent: bool,
) -> Result<Vec<&'static str>, SetupError> {
    let mut registered = Vec::new();

    if let Some(sql) = gcs_secret_sql(&storage.gcs, persistent) {
        tracing::info!(secret = GCS_SECRET_NAME, "Registering GCS secret");
        register(conn, GCS_SECRET_NAME, &sql)?;
        registered.push(GCS_SECRET_NAME);
    }

    if let Some(sql) = s3_secret_sql(&storage.s3, persistent) {
        tracing::info!(secret = S3_SECRET_NAME, "Registering S3 secret");
        register(conn, S3_SECRET_NAME, &sql)?;
        registered.push(S3_SECRET_NAME);
    }

    Ok(registered)
}

/// Names of secrets currently known to the engine.
pub fn list_secret_names(conn: &Connection) -> Result<Vec<String>, SetupError> {
    let mut stmt = conn
        .prepare("SELECT name FROM duckdb_secrets() ORDER BY name")
        .map_err(|e| SetupError::Attachment(format!("Failed to list secrets: {}", e)))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<Result<Vec<String>, _>>())
        .map_err(|e| SetupError::Attachment(format!("Failed to list secrets: {}", e)))?;
    Ok(names)
}
