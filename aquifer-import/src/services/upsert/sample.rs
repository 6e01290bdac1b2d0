use sqlx::SqliteConnection;

use crate::error::{ImportError, ImportResult};
use crate::ingest::types::{SampleInput, SamplingEvent};
use crate::store::repository::samples;

/// Find the sampling event with the same key, or create it
///
/// Existing events are returned unchanged.
pub async fn upsert_sample(
    conn: &mut SqliteConnection,
    input: &SampleInput,
) -> ImportResult<SamplingEvent> {
    if input.well_id <= 0 {
        return Err(ImportError::invalid_input(
            "well_id",
            format!("must be a stored well id, got {}", input.well_id),
        ));
    }
    if input.campaign.trim().is_empty() {
        return Err(ImportError::invalid_input("campaign", "must not be empty"));
    }

    if let Some(existing) = samples::find_by_key(conn, input).await? {
        return Ok(existing);
    }

    let created = samples::insert(conn, input).await?;
    log::debug!(
        "Created sampling event {} for well {} ({:?}, {:?})",
        created.sampling_id,
        created.well_id,
        created.sample_date,
        created.year
    );
    Ok(created)
}
