use sqlx::SqliteConnection;

use crate::error::{ImportError, ImportResult};
use crate::ingest::types::{Measurement, MeasurementInput};
use crate::services::merge::MergePolicy;
use crate::store::repository::measurements;

/// Insert a measurement, or merge it into the stored one with the same key
///
/// Each of value, text and unit takes the incoming value when present.
pub async fn upsert_measurement(
    conn: &mut SqliteConnection,
    input: &MeasurementInput,
) -> ImportResult<Measurement> {
    if input.sampling_id <= 0 {
        return Err(ImportError::invalid_input(
            "sampling_id",
            format!("must be a stored sampling id, got {}", input.sampling_id),
        ));
    }
    if input.param_code.trim().is_empty() {
        return Err(ImportError::invalid_input("param_code", "must not be empty"));
    }

    match measurements::find(conn, input.sampling_id, &input.param_code).await? {
        Some(existing) => {
            let policy = MergePolicy::Descriptive;
            let merged = Measurement {
                value: policy.merge(existing.value, input.value),
                value_text: policy.merge(existing.value_text.clone(), input.value_text.clone()),
                original_unit: policy.merge(
                    existing.original_unit.clone(),
                    input.original_unit.clone(),
                ),
                ..existing
            };
            measurements::update(conn, &merged).await
        }
        None => measurements::insert(conn, input).await,
    }
}
