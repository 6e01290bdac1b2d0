//! Measurement queries

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::error::ImportResult;
use crate::ingest::types::{Measurement, MeasurementInput};

fn measurement_from_row(row: &SqliteRow) -> Result<Measurement, sqlx::Error> {
    Ok(Measurement {
        sampling_id: row.try_get("sampling_id")?,
        param_code: row.try_get("param_code")?,
        value: row.try_get("value")?,
        value_text: row.try_get("value_text")?,
        original_unit: row.try_get("original_unit")?,
    })
}

pub async fn find(
    conn: &mut SqliteConnection,
    sampling_id: i64,
    param_code: &str,
) -> ImportResult<Option<Measurement>> {
    let row = sqlx::query(
        r#"
        SELECT sampling_id, param_code, value, value_text, original_unit
        FROM measurements
        WHERE sampling_id = ? AND param_code = ?
        LIMIT 1
        "#,
    )
    .bind(sampling_id)
    .bind(param_code)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(measurement_from_row).transpose()?)
}

pub async fn insert(
    conn: &mut SqliteConnection,
    input: &MeasurementInput,
) -> ImportResult<Measurement> {
    let row = sqlx::query(
        r#"
        INSERT INTO measurements (sampling_id, param_code, value, value_text, original_unit)
        VALUES (?, ?, ?, ?, ?)
        RETURNING sampling_id, param_code, value, value_text, original_unit
        "#,
    )
    .bind(input.sampling_id)
    .bind(&input.param_code)
    .bind(input.value)
    .bind(&input.value_text)
    .bind(&input.original_unit)
    .fetch_one(&mut *conn)
    .await?;

    Ok(measurement_from_row(&row)?)
}

/// Overwrite the value fields of a stored measurement
pub async fn update(conn: &mut SqliteConnection, measurement: &Measurement) -> ImportResult<Measurement> {
    let row = sqlx::query(
        r#"
        UPDATE measurements
        SET value = ?,
            value_text = ?,
            original_unit = ?
        WHERE sampling_id = ? AND param_code = ?
        RETURNING sampling_id, param_code, value, value_text, original_unit
        "#,
    )
    .bind(measurement.value)
    .bind(&measurement.value_text)
    .bind(&measurement.original_unit)
    .bind(measurement.sampling_id)
    .bind(&measurement.param_code)
    .fetch_one(&mut *conn)
    .await?;

    Ok(measurement_from_row(&row)?)
}

/// Measurements of one sampling event, by parameter code
pub async fn list_for_sample(
    conn: &mut SqliteConnection,
    sampling_id: i64,
) -> ImportResult<Vec<Measurement>> {
    let rows = sqlx::query(
        r#"
        SELECT sampling_id, param_code, value, value_text, original_unit
        FROM measurements
        WHERE sampling_id = ?
        ORDER BY param_code
        "#,
    )
    .bind(sampling_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(measurement_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

pub async fn count(conn: &mut SqliteConnection) -> ImportResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM measurements")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
