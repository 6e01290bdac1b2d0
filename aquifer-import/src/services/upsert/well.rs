use sqlx::SqliteConnection;

use crate::error::{ImportError, ImportResult};
use crate::ingest::types::{Well, WellInput};
use crate::services::merge::MergePolicy;
use crate::store::repository::wells;

/// How an incoming well was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellMatch {
    /// Same (source_code, well_code) pair already stored
    ByCode,
    /// Nearest stored well within the spatial tolerance
    BySpatial,
    /// No match; a new well was inserted
    Created,
}

impl WellMatch {
    pub fn label(&self) -> &'static str {
        match self {
            WellMatch::ByCode => "code",
            WellMatch::BySpatial => "spatial",
            WellMatch::Created => "created",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WellUpsert {
    pub well: Well,
    pub matched: WellMatch,
}

/// Resolve an incoming well to a stored one, merging or inserting
///
/// Identifier lookup wins over spatial lookup. A spatial candidate is
/// accepted when its distance is at most `tolerance`; on equal distances the
/// oldest well wins.
pub async fn upsert_well(
    conn: &mut SqliteConnection,
    input: &WellInput,
    tolerance: f64,
) -> ImportResult<WellUpsert> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ImportError::invalid_input(
            "tolerance",
            format!("must be a finite non-negative number, got {}", tolerance),
        ));
    }

    let mut found = None;

    if let Some((source_code, well_code)) = input.identifier() {
        if let Some(well) = wells::find_by_identifier(conn, source_code, well_code).await? {
            found = Some((well, WellMatch::ByCode));
        }
    }

    if found.is_none() {
        if let Some((x, y)) = input.coordinates() {
            if let Some(well) = nearest_within(conn, x, y, tolerance).await? {
                found = Some((well, WellMatch::BySpatial));
            }
        }
    }

    match found {
        Some((existing, matched)) => {
            log::debug!(
                "Well {} matched by {} for code {:?} at ({:?}, {:?})",
                existing.well_id,
                matched.label(),
                input.well_code,
                input.x,
                input.y
            );
            let merged = merge_well(existing, input);
            let well = wells::update(conn, &merged).await?;
            Ok(WellUpsert { well, matched })
        }
        None => {
            let well = wells::insert(conn, input).await?;
            log::debug!(
                "Created well {} for code {:?} at ({:?}, {:?})",
                well.well_id,
                input.well_code,
                input.x,
                input.y
            );
            Ok(WellUpsert {
                well,
                matched: WellMatch::Created,
            })
        }
    }
}

async fn nearest_within(
    conn: &mut SqliteConnection,
    x: f64,
    y: f64,
    tolerance: f64,
) -> ImportResult<Option<Well>> {
    let candidates = wells::find_in_bounding_box(conn, x, y, tolerance).await?;

    // Candidates come ordered by well_id, so strict `<` keeps the oldest on ties
    let mut best: Option<(f64, Well)> = None;
    for well in candidates {
        let Some(distance) = well.distance_to(x, y) else {
            continue;
        };
        if distance > tolerance {
            continue;
        }
        match &best {
            Some((best_distance, _)) if distance >= *best_distance => {}
            _ => best = Some((distance, well)),
        }
    }

    Ok(best.map(|(_, well)| well))
}

fn merge_well(existing: Well, input: &WellInput) -> Well {
    let protected = MergePolicy::Protected;
    let descriptive = MergePolicy::Descriptive;

    Well {
        well_id: existing.well_id,
        well_code: protected.merge(existing.well_code, input.well_code.clone()),
        source_code: protected.merge(existing.source_code, input.source_code.clone()),
        district: descriptive.merge(existing.district, input.district.clone()),
        locality: descriptive.merge(existing.locality, input.locality.clone()),
        x: descriptive.merge(existing.x, input.x),
        y: descriptive.merge(existing.y, input.y),
        elevation_m: descriptive.merge(existing.elevation_m, input.elevation_m),
        depth_m: descriptive.merge(existing.depth_m, input.depth_m),
    }
}
