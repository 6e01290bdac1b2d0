//! Catalog command handlers

use anyhow::{Context, Result};
use colored::*;

use super::CatalogCommands;
use crate::config::Settings;
use crate::ingest::catalog::{import_catalog, read_catalog_csv};
use crate::services::aliases::AliasMap;
use crate::store::repository::catalog::list_parameters;

pub async fn handle_catalog_command(cmd: CatalogCommands, settings: Settings) -> Result<()> {
    match cmd {
        CatalogCommands::Import { file } => {
            let rows = read_catalog_csv(&file)?;
            let pool = crate::cli::open_store(&settings).await?;

            // All or nothing: a bad line leaves the catalog untouched
            let mut tx = pool.begin().await.context("Failed to start transaction")?;
            let result = import_catalog(&mut *tx, &rows)
                .await
                .with_context(|| format!("Failed to import catalog from {}", file.display()))?;
            tx.commit().await.context("Failed to commit catalog import")?;

            println!(
                "{} {} catalog rows from {}",
                "Loaded".green().bold(),
                result.parameters,
                file.display().to_string().cyan()
            );
            println!(
                "  Aliases: {} new, {} already present",
                result.aliases_added.to_string().green(),
                result.aliases_existing.to_string().dimmed()
            );
            Ok(())
        }
        CatalogCommands::List { campaign } => {
            let profile = settings.campaign(&campaign).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown campaign '{}'. Use 'aquifer-import campaigns' to list them.",
                    campaign
                )
            })?;

            let pool = crate::cli::open_store(&settings).await?;
            let mut conn = pool.acquire().await.context("Failed to acquire connection")?;
            let parameters = list_parameters(&mut conn)
                .await
                .context("Failed to load parameter catalog")?;
            let aliases = AliasMap::load(&mut conn, &profile.name)
                .await
                .context("Failed to load aliases")?;

            println!(
                "{} {} ({} aliases over {} catalog parameters)",
                "Campaign".bold(),
                profile.name.bright_cyan().bold(),
                aliases.len(),
                parameters.len()
            );
            for (alias, info) in aliases.sorted_entries() {
                let unit = info
                    .standard_unit
                    .as_deref()
                    .map(|u| format!(" [{}]", u))
                    .unwrap_or_default();
                println!(
                    "  {:<30} -> {}{}",
                    alias,
                    info.param_code.green(),
                    unit.dimmed()
                );
            }

            if !profile.fallback_aliases.is_empty() {
                println!("{}", "Fallback aliases:".bold());
                for (alias, code) in &profile.fallback_aliases {
                    println!("  {:<30} -> {}", alias, code.yellow());
                }
            }
            Ok(())
        }
    }
}
