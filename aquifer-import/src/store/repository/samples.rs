//! Sampling event queries

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::error::ImportResult;
use crate::ingest::types::{SampleInput, SamplingEvent};

fn sample_from_row(row: &SqliteRow) -> Result<SamplingEvent, sqlx::Error> {
    Ok(SamplingEvent {
        sampling_id: row.try_get("sampling_id")?,
        well_id: row.try_get("well_id")?,
        campaign: row.try_get("campaign")?,
        sample_date: row.try_get("sample_date")?,
        year: row.try_get("year")?,
    })
}

/// Find an event by its key; `IS` makes NULL dates/years compare equal
pub async fn find_by_key(
    conn: &mut SqliteConnection,
    input: &SampleInput,
) -> ImportResult<Option<SamplingEvent>> {
    let row = sqlx::query(
        r#"
        SELECT sampling_id, well_id, campaign, sample_date, year
        FROM sampling_events
        WHERE well_id = ?
          AND campaign = ?
          AND sample_date IS ?
          AND year IS ?
        LIMIT 1
        "#,
    )
    .bind(input.well_id)
    .bind(&input.campaign)
    .bind(input.sample_date)
    .bind(input.year)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(sample_from_row).transpose()?)
}

pub async fn insert(conn: &mut SqliteConnection, input: &SampleInput) -> ImportResult<SamplingEvent> {
    let row = sqlx::query(
        r#"
        INSERT INTO sampling_events (well_id, campaign, sample_date, year)
        VALUES (?, ?, ?, ?)
        RETURNING sampling_id, well_id, campaign, sample_date, year
        "#,
    )
    .bind(input.well_id)
    .bind(&input.campaign)
    .bind(input.sample_date)
    .bind(input.year)
    .fetch_one(&mut *conn)
    .await?;

    Ok(sample_from_row(&row)?)
}

/// Sampling events of one well, oldest first
pub async fn list_for_well(
    conn: &mut SqliteConnection,
    well_id: i64,
) -> ImportResult<Vec<SamplingEvent>> {
    let rows = sqlx::query(
        r#"
        SELECT sampling_id, well_id, campaign, sample_date, year
        FROM sampling_events
        WHERE well_id = ?
        ORDER BY sampling_id
        "#,
    )
    .bind(well_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(sample_from_row)
        .collect::<Result<Vec<_>, _>>()?)
}

pub async fn count(conn: &mut SqliteConnection) -> ImportResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sampling_events")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
