//! Parameter catalog queries

use sqlx::SqliteConnection;

use crate::error::ImportResult;
use crate::ingest::types::CatalogEntry;

/// Insert or refresh a catalog entry
///
/// A missing standard unit never erases one already on file.
pub async fn upsert_parameter(conn: &mut SqliteConnection, entry: &CatalogEntry) -> ImportResult<()> {
    sqlx::query(
        r#"
        INSERT INTO param_catalog (param_code, param_name, standard_unit)
        VALUES (?, ?, ?)
        ON CONFLICT(param_code) DO UPDATE SET
            param_name = excluded.param_name,
            standard_unit = COALESCE(excluded.standard_unit, param_catalog.standard_unit)
        "#,
    )
    .bind(&entry.param_code)
    .bind(&entry.param_name)
    .bind(&entry.standard_unit)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// All catalog entries by code
pub async fn list_parameters(conn: &mut SqliteConnection) -> ImportResult<Vec<CatalogEntry>> {
    let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(
        "SELECT param_code, param_name, standard_unit FROM param_catalog ORDER BY param_code",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(param_code, param_name, standard_unit)| CatalogEntry {
            param_code,
            param_name,
            standard_unit,
        })
        .collect())
}
