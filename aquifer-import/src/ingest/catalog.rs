//! Parameter catalog reference data loaded from CSV
//!
//! Expected headers: `param_code,param_name,standard_unit,alias,campaign`.
//! A parameter with several aliases repeats its catalog columns on each line;
//! the last non-empty name and unit win.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::SqliteConnection;

use crate::error::{ImportError, ImportResult};
use crate::ingest::types::CatalogEntry;
use crate::store::repository::{aliases, catalog};

/// One CSV line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogRow {
    pub param_code: String,
    pub param_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub standard_unit: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub alias: Option<String>,
    /// Empty for aliases that apply to every campaign
    #[serde(default, deserialize_with = "blank_as_none")]
    pub campaign: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Counts reported after a catalog import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogImport {
    pub parameters: usize,
    pub aliases_added: usize,
    pub aliases_existing: usize,
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        // Line 1 is the header
        let row = record.with_context(|| format!("Invalid catalog line {}", idx + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_catalog_csv(path: &Path) -> Result<Vec<CatalogRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;
    read_catalog(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))
}

/// Upsert catalog entries and insert aliases that are not stored yet
pub async fn import_catalog(
    conn: &mut SqliteConnection,
    rows: &[CatalogRow],
) -> ImportResult<CatalogImport> {
    let mut result = CatalogImport::default();

    for row in rows {
        let param_code = row.param_code.trim();
        if param_code.is_empty() {
            return Err(ImportError::invalid_input("param_code", "must not be empty"));
        }
        let param_name = match row.param_name.trim() {
            "" => param_code,
            name => name,
        };

        catalog::upsert_parameter(
            conn,
            &CatalogEntry {
                param_code: param_code.to_string(),
                param_name: param_name.to_string(),
                standard_unit: row.standard_unit.clone(),
            },
        )
        .await?;
        result.parameters += 1;

        if let Some(alias) = &row.alias {
            if aliases::insert_alias(conn, alias, row.campaign.as_deref(), param_code).await? {
                result.aliases_added += 1;
            } else {
                result.aliases_existing += 1;
            }
        }
    }

    log::info!(
        "Catalog import: {} rows, {} new aliases, {} already present",
        result.parameters,
        result.aliases_added,
        result.aliases_existing
    );
    Ok(result)
}
