//! Row-by-row reconciliation with one transaction per row

use std::collections::BTreeSet;

use sqlx::{SqliteConnection, SqlitePool};

use super::adapter::{CampaignRecord, adapt_row};
use super::summary::RunSummary;
use crate::config::CampaignProfile;
use crate::error::{ImportError, ImportResult};
use crate::ingest::normalize::normalize_cell;
use crate::ingest::types::{CellValue, MeasurementInput, RawRow, SampleInput};
use crate::services::aliases::{AliasMap, ColumnLookup, ColumnMapping};
use crate::services::upsert::{upsert_measurement, upsert_sample, upsert_well};

/// Imports the rows of one campaign into the store
pub struct ImportPipeline<'a> {
    pool: &'a SqlitePool,
    profile: &'a CampaignProfile,
    aliases: AliasMap,
    tolerance: f64,
}

impl<'a> ImportPipeline<'a> {
    /// Validate the profile and load the campaign's alias map
    pub async fn prepare(
        pool: &'a SqlitePool,
        profile: &'a CampaignProfile,
        tolerance: f64,
    ) -> ImportResult<Self> {
        profile.validate()?;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ImportError::config(format!(
                "spatial tolerance must be a non-negative number, got {}",
                tolerance
            )));
        }

        let mut conn = pool.acquire().await?;
        let aliases = AliasMap::load(&mut conn, &profile.name).await?;
        Ok(Self::with_aliases(pool, profile, aliases, tolerance))
    }

    /// Build a pipeline around an already loaded alias map
    pub fn with_aliases(
        pool: &'a SqlitePool,
        profile: &'a CampaignProfile,
        aliases: AliasMap,
        tolerance: f64,
    ) -> Self {
        Self {
            pool,
            profile,
            aliases,
            tolerance,
        }
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Import rows in order; a failing row is rolled back and reported,
    /// the remaining rows still run
    pub async fn run(&self, rows: &[RawRow]) -> RunSummary {
        let mut summary = RunSummary::new(&self.profile.name);

        for (idx, row) in rows.iter().enumerate() {
            let row_number = row.sheet_row().unwrap_or(idx + 2);

            let record = adapt_row(self.profile, row);
            let columns = self.resolve_columns(&record, &mut summary.unmapped_columns);

            match self.process_record(&record, &columns).await {
                Ok(written) => {
                    log::debug!("Row {}: {} measurements written", row_number, written);
                    summary.record_success();
                }
                Err(err) => {
                    let message = err.to_string();
                    log::warn!("{}", err.for_row(row_number));
                    summary.record_failure(row_number, message);
                }
            }
        }

        log::info!(
            "Campaign '{}' finished: {} processed, {} failed, {} unmapped columns",
            summary.campaign,
            summary.processed,
            summary.failed,
            summary.unmapped_columns.len()
        );

        summary
    }

    /// Map each parameter column to a param code, noting unmapped headers
    fn resolve_columns<'r>(
        &self,
        record: &'r CampaignRecord,
        unmapped: &mut BTreeSet<String>,
    ) -> Vec<(ColumnMapping, &'r CellValue)> {
        let mut columns = Vec::new();
        for (header, value) in &record.parameters {
            match self.aliases.resolve(header, &self.profile.fallback_aliases) {
                ColumnLookup::Mapped(mapping) => {
                    log::trace!(
                        "Column '{}' -> {} {}",
                        header,
                        mapping.param_code,
                        mapping.stage.label()
                    );
                    columns.push((mapping, value));
                }
                ColumnLookup::Unmapped(name) => {
                    if unmapped.insert(name.clone()) {
                        log::debug!("Column '{}' has no alias, skipping", name);
                    }
                }
                ColumnLookup::Skipped => {}
            }
        }
        columns
    }

    async fn process_record(
        &self,
        record: &CampaignRecord,
        columns: &[(ColumnMapping, &CellValue)],
    ) -> ImportResult<usize> {
        let mut tx = self.pool.begin().await?;

        match self.write_record(&mut *tx, record, columns).await {
            Ok(written) => {
                tx.commit().await?;
                Ok(written)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::warn!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    async fn write_record(
        &self,
        conn: &mut SqliteConnection,
        record: &CampaignRecord,
        columns: &[(ColumnMapping, &CellValue)],
    ) -> ImportResult<usize> {
        let well = upsert_well(conn, &record.well, self.tolerance).await?.well;

        let sample = upsert_sample(
            conn,
            &SampleInput {
                well_id: well.well_id,
                campaign: self.profile.name.clone(),
                sample_date: record.sample_date,
                year: record.year,
            },
        )
        .await?;

        let mut written = 0;
        for (mapping, raw) in columns {
            let reading = normalize_cell(raw);
            if reading.is_blank() {
                continue;
            }
            upsert_measurement(
                conn,
                &MeasurementInput {
                    sampling_id: sample.sampling_id,
                    param_code: mapping.param_code.clone(),
                    value: reading.value,
                    value_text: reading.text,
                    original_unit: mapping.original_unit.clone(),
                },
            )
            .await?;
            written += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{CatalogEntry, ParameterAlias};
    use crate::store::memory_pool;
    use crate::store::repository::{aliases, catalog, measurements, samples, wells};

    async fn seed_catalog(pool: &SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        for (code, name, alias) in [
            ("nitrate", "Nitrate", "Nitratos"),
            ("chloride", "Chloride", "Cloruros"),
            ("ph", "pH", "pH"),
        ] {
            catalog::upsert_parameter(
                &mut conn,
                &CatalogEntry {
                    param_code: code.into(),
                    param_name: name.into(),
                    standard_unit: Some("mg/L".into()),
                },
            )
            .await
            .unwrap();
            aliases::insert_alias(&mut conn, alias, None, code).await.unwrap();
        }
    }

    fn survey_row(code: &str, x: f64, nitrate: f64) -> RawRow {
        RawRow::new()
            .with("No", 1.0)
            .with("Codigo", code)
            .with("Localidad", "Capiatá")
            .with("X-UTM", x)
            .with("Y-UTM", 7_190_000.0)
            .with("Fecha_mues", "15/03/2001")
            .with("Nitratos (mg/L)", nitrate)
            .with(" Cloruros", "< 5")
            .with("Turbidez (NTU)", 3.0)
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let pool = memory_pool().await;
        seed_catalog(&pool).await;
        let profile = CampaignProfile::builtin("GA_calidad_2001").unwrap();
        let rows = vec![
            survey_row("P-1", 440_000.0, 10.0),
            survey_row("P-2", 441_000.0, 12.5),
        ];

        let pipeline = ImportPipeline::prepare(&pool, &profile, 1.0).await.unwrap();
        let first = pipeline.run(&rows).await;
        assert_eq!(first.processed, 2);
        assert_eq!(first.failed, 0);
        assert_eq!(
            first.unmapped_columns.iter().collect::<Vec<_>>(),
            vec!["Turbidez (NTU)"]
        );

        let mut conn = pool.acquire().await.unwrap();
        let counts_after_first = (
            wells::count(&mut conn).await.unwrap(),
            samples::count(&mut conn).await.unwrap(),
            measurements::count(&mut conn).await.unwrap(),
        );
        assert_eq!(counts_after_first, (2, 2, 4));
        drop(conn);

        let second = pipeline.run(&rows).await;
        assert_eq!(second.processed, 2);

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(wells::count(&mut conn).await.unwrap(), 2);
        assert_eq!(samples::count(&mut conn).await.unwrap(), 2);
        assert_eq!(measurements::count(&mut conn).await.unwrap(), 4);

        let stored = wells::list(&mut conn).await.unwrap();
        let events = samples::list_for_well(&mut conn, stored[0].well_id).await.unwrap();
        let values = measurements::list_for_sample(&mut conn, events[0].sampling_id)
            .await
            .unwrap();
        assert_eq!(values[0].param_code, "chloride");
        assert_eq!(values[0].value_text.as_deref(), Some("< 5"));
        assert_eq!(values[1].param_code, "nitrate");
        assert_eq!(values[1].value, Some(10.0));
        assert_eq!(values[1].original_unit.as_deref(), Some("mg/L"));
    }

    #[tokio::test]
    async fn test_failing_row_is_isolated() {
        let pool = memory_pool().await;
        seed_catalog(&pool).await;
        let profile = CampaignProfile::builtin("GA_calidad_2001").unwrap();

        // An alias pointing at an empty code makes any row using it invalid
        let mut conn = pool.acquire().await.unwrap();
        let mut alias_rows = aliases::load_for_campaign(&mut conn, &profile.name)
            .await
            .unwrap();
        drop(conn);
        alias_rows.push(ParameterAlias {
            alias: "Arsenico".into(),
            campaign: None,
            param_code: String::new(),
            standard_unit: None,
            param_name: "broken".into(),
        });
        let alias_map = AliasMap::from_aliases(&profile.name, alias_rows);
        let pipeline = ImportPipeline::with_aliases(&pool, &profile, alias_map, 1.0);

        let rows: Vec<RawRow> = (0..10)
            .map(|i| {
                let row = survey_row(&format!("P-{}", i), 440_000.0 + 100.0 * i as f64, 1.0);
                if i == 4 { row.with("Arsenico", 0.01) } else { row.with("Arsenico", "") }
            })
            .collect();

        let summary = pipeline.run(&rows).await;
        assert_eq!(summary.processed, 9);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].row_number, 6);
        assert!(summary.failures[0].message.contains("param_code"));

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(wells::count(&mut conn).await.unwrap(), 9);
        assert_eq!(samples::count(&mut conn).await.unwrap(), 9);
        assert_eq!(measurements::count(&mut conn).await.unwrap(), 18);
        let codes: Vec<_> = wells::list(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|w| w.well_code)
            .collect();
        assert!(!codes.contains(&"P-4".to_string()));
    }

    #[tokio::test]
    async fn test_year_only_campaign_defaults() {
        let pool = memory_pool().await;
        seed_catalog(&pool).await;
        let profile = CampaignProfile::builtin("GA_calidad_tesis_2006").unwrap();
        let rows = vec![
            RawRow::at_sheet_row(2)
                .with("No", 1.0)
                .with("Distrito", "Luque")
                .with("X", 450_000.0)
                .with("Y", 7_200_000.0)
                .with("Año", "")
                .with("Contaminación?", "no")
                .with("Nitratos", "12,5"),
        ];

        let pipeline = ImportPipeline::prepare(&pool, &profile, 1.0).await.unwrap();
        let summary = pipeline.run(&rows).await;
        assert_eq!(summary.processed, 1);
        assert!(summary.unmapped_columns.is_empty());

        let mut conn = pool.acquire().await.unwrap();
        let well = &wells::list(&mut conn).await.unwrap()[0];
        assert_eq!(well.well_code, None);
        assert_eq!(well.source_code.as_deref(), Some("GA_calidad_tesis_2006"));
        let event = &samples::list_for_well(&mut conn, well.well_id).await.unwrap()[0];
        assert_eq!(event.year, Some(2006));
        assert_eq!(
            event.sample_date,
            chrono::NaiveDate::from_ymd_opt(2006, 1, 1)
        );
        let values = measurements::list_for_sample(&mut conn, event.sampling_id)
            .await
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, Some(12.5));
    }

    #[tokio::test]
    async fn test_fallback_alias_maps_2018_ph() {
        let pool = memory_pool().await;
        let profile = CampaignProfile::builtin("GA_calidad_FP_2018").unwrap();
        // Empty alias table: pH only resolves through the campaign fallback
        let pipeline = ImportPipeline::prepare(&pool, &profile, 1.0).await.unwrap();
        assert!(pipeline.aliases().is_empty());

        let rows = vec![
            RawRow::new()
                .with("codigo_pozo", "FP-1")
                .with("x", 1.0)
                .with("y", 2.0)
                .with("pH", "7,4"),
        ];
        let summary = pipeline.run(&rows).await;
        assert_eq!(summary.processed, 1);

        let mut conn = pool.acquire().await.unwrap();
        let stored = measurements::find(&mut conn, 1, "ph").await.unwrap().unwrap();
        assert_eq!(stored.value, Some(7.4));
    }

    #[tokio::test]
    async fn test_prepare_rejects_bad_tolerance() {
        let pool = memory_pool().await;
        let profile = CampaignProfile::builtin("GA_calidad_2001").unwrap();
        assert!(ImportPipeline::prepare(&pool, &profile, -0.5).await.is_err());
    }
}
