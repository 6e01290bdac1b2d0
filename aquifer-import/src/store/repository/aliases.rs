//! Parameter alias queries

use sqlx::{Row, SqliteConnection};

use crate::error::ImportResult;
use crate::ingest::types::ParameterAlias;

/// Aliases visible to a campaign: its own first, then the generic ones
pub async fn load_for_campaign(
    conn: &mut SqliteConnection,
    campaign: &str,
) -> ImportResult<Vec<ParameterAlias>> {
    let rows = sqlx::query(
        r#"
        SELECT pa.alias, pa.campaign, pa.param_code, pc.standard_unit, pc.param_name
        FROM param_alias pa
        JOIN param_catalog pc ON pc.param_code = pa.param_code
        WHERE pa.campaign IS NULL OR pa.campaign = ?
        ORDER BY CASE WHEN pa.campaign IS NULL THEN 1 ELSE 0 END, pa.alias, pa.id
        "#,
    )
    .bind(campaign)
    .fetch_all(&mut *conn)
    .await?;

    let mut aliases = Vec::with_capacity(rows.len());
    for row in rows {
        aliases.push(ParameterAlias {
            alias: row.try_get("alias")?,
            campaign: row.try_get("campaign")?,
            param_code: row.try_get("param_code")?,
            standard_unit: row.try_get("standard_unit")?,
            param_name: row.try_get("param_name")?,
        });
    }

    Ok(aliases)
}

/// Register an alias; existing (alias, campaign) pairs are left untouched
///
/// Returns whether a row was inserted.
pub async fn insert_alias(
    conn: &mut SqliteConnection,
    alias: &str,
    campaign: Option<&str>,
    param_code: &str,
) -> ImportResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO param_alias (alias, campaign, param_code)
        VALUES (?, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(alias)
    .bind(campaign)
    .bind(param_code)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
