//! Well queries

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::error::ImportResult;
use crate::ingest::types::{Well, WellInput};

fn well_from_row(row: &SqliteRow) -> Result<Well, sqlx::Error> {
    Ok(Well {
        well_id: row.try_get("well_id")?,
        well_code: row.try_get("well_code")?,
        source_code: row.try_get("source_code")?,
        district: row.try_get("district")?,
        locality: row.try_get("locality")?,
        x: row.try_get("x")?,
        y: row.try_get("y")?,
        elevation_m: row.try_get("elevation_m")?,
        depth_m: row.try_get("depth_m")?,
    })
}

/// Find the well registered under an exact (source_code, well_code) pair
pub async fn find_by_identifier(
    conn: &mut SqliteConnection,
    source_code: &str,
    well_code: &str,
) -> ImportResult<Option<Well>> {
    let row = sqlx::query(
        r#"
        SELECT well_id, well_code, source_code, district, locality, x, y, elevation_m, depth_m
        FROM wells
        WHERE source_code = ? AND well_code = ?
        LIMIT 1
        "#,
    )
    .bind(source_code)
    .bind(well_code)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(well_from_row).transpose()?)
}

/// Wells with coordinates inside the square of half-width `radius` around (x, y)
pub async fn find_in_bounding_box(
    conn: &mut SqliteConnection,
    x: f64,
    y: f64,
    radius: f64,
) -> ImportResult<Vec<Well>> {
    let rows = sqlx::query(
        r#"
        SELECT well_id, well_code, source_code, district, locality, x, y, elevation_m, depth_m
        FROM wells
        WHERE x IS NOT NULL AND y IS NOT NULL
          AND x BETWEEN ? AND ?
          AND y BETWEEN ? AND ?
        ORDER BY well_id
        "#,
    )
    .bind(x - radius)
    .bind(x + radius)
    .bind(y - radius)
    .bind(y + radius)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(well_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Insert a new well with every provided field
pub async fn insert(conn: &mut SqliteConnection, input: &WellInput) -> ImportResult<Well> {
    let row = sqlx::query(
        r#"
        INSERT INTO wells (well_code, source_code, district, locality, x, y, elevation_m, depth_m)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING well_id, well_code, source_code, district, locality, x, y, elevation_m, depth_m
        "#,
    )
    .bind(&input.well_code)
    .bind(&input.source_code)
    .bind(&input.district)
    .bind(&input.locality)
    .bind(input.x)
    .bind(input.y)
    .bind(input.elevation_m)
    .bind(input.depth_m)
    .fetch_one(&mut *conn)
    .await?;

    Ok(well_from_row(&row)?)
}

/// Overwrite every mutable field of a stored well
pub async fn update(conn: &mut SqliteConnection, well: &Well) -> ImportResult<Well> {
    let row = sqlx::query(
        r#"
        UPDATE wells
        SET well_code = ?,
            source_code = ?,
            district = ?,
            locality = ?,
            x = ?,
            y = ?,
            elevation_m = ?,
            depth_m = ?
        WHERE well_id = ?
        RETURNING well_id, well_code, source_code, district, locality, x, y, elevation_m, depth_m
        "#,
    )
    .bind(&well.well_code)
    .bind(&well.source_code)
    .bind(&well.district)
    .bind(&well.locality)
    .bind(well.x)
    .bind(well.y)
    .bind(well.elevation_m)
    .bind(well.depth_m)
    .bind(well.well_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(well_from_row(&row)?)
}

/// All wells, oldest first
pub async fn list(conn: &mut SqliteConnection) -> ImportResult<Vec<Well>> {
    let rows = sqlx::query(
        r#"
        SELECT well_id, well_code, source_code, district, locality, x, y, elevation_m, depth_m
        FROM wells
        ORDER BY well_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(well_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

pub async fn count(conn: &mut SqliteConnection) -> ImportResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wells")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
