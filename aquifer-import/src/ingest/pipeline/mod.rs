//! Campaign import pipeline: workbook rows into wells, samples and measurements

mod adapter;
mod engine;
mod summary;

pub use adapter::{CampaignRecord, adapt_row};
pub use engine::ImportPipeline;
pub use summary::{RowFailure, RunSummary};

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;

use crate::config::{CampaignProfile, Settings};
use crate::error::ImportResult;
use crate::ingest::excel::{read_first_sheet, resolve_source_file};

/// Import one campaign workbook
///
/// `file` overrides the profile's file lookup under the data directory.
pub async fn run_import(
    pool: &SqlitePool,
    settings: &Settings,
    profile: &CampaignProfile,
    file: Option<&Path>,
) -> ImportResult<RunSummary> {
    let path: PathBuf = match file {
        Some(path) => path.to_path_buf(),
        None => resolve_source_file(&settings.data_dir, profile)?,
    };
    log::info!("Reading {} for campaign '{}'", path.display(), profile.name);

    let rows = read_first_sheet(&path)?;
    log::info!("{} data rows to import", rows.len());

    let pipeline = ImportPipeline::prepare(pool, profile, settings.tolerance_for(profile)).await?;
    Ok(pipeline.run(&rows).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::store::memory_pool;
    use crate::store::repository::wells;
    use rust_xlsxwriter::Workbook;

    #[tokio::test]
    async fn test_run_import_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Distrito", "X", "Y", "Año", "Nitratos"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "Areguá").unwrap();
        sheet.write_number(1, 1, 455_000.0).unwrap();
        sheet.write_number(1, 2, 7_195_000.0).unwrap();
        sheet.write_number(1, 3, 2006.0).unwrap();
        sheet.write_number(1, 4, 8.0).unwrap();
        workbook
            .save(dir.path().join("GA_calidad_tesis_2006_.xlsx"))
            .unwrap();

        let settings = Settings {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let profile = settings.campaign("2006").unwrap().clone();
        let pool = memory_pool().await;

        let summary = run_import(&pool, &settings, &profile, None).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 0);
        // No catalog loaded: the parameter column is reported, not stored
        assert!(summary.unmapped_columns.contains("Nitratos"));

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(wells::count(&mut conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_import_without_workbook_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let profile = settings.campaign("2001").unwrap().clone();
        let pool = memory_pool().await;

        let err = run_import(&pool, &settings, &profile, None).await.unwrap_err();
        assert!(matches!(err, ImportError::UnresolvedFile { .. }));
    }
}
