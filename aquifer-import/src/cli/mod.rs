//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use crate::config::Settings;
use commands::catalog::CatalogCommands;
use commands::import::{ImportAllArgs, ImportArgs};

#[derive(Parser, Debug)]
#[command(name = "aquifer-import")]
#[command(version, about = "Reconcile groundwater-quality survey spreadsheets into a monitoring database")]
pub struct Cli {
    /// Campaigns TOML file (default: <config_dir>/aquifer-import/campaigns.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import one campaign workbook
    Import(ImportArgs),
    /// Import every configured campaign in turn
    ImportAll(ImportAllArgs),
    /// List configured campaign profiles
    Campaigns,
    /// Manage the parameter catalog and aliases
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }

    match cli.command {
        Commands::Import(args) => commands::import::handle_import_command(args, settings).await,
        Commands::ImportAll(args) => {
            commands::import::handle_import_all_command(args, settings).await
        }
        Commands::Campaigns => commands::campaigns::handle_campaigns_command(&settings),
        Commands::Catalog(cmd) => commands::catalog::handle_catalog_command(cmd, settings).await,
    }
}

/// Open the database named in the settings
pub(crate) async fn open_store(settings: &Settings) -> Result<SqlitePool> {
    crate::store::connect(&settings.database_url)
        .await
        .with_context(|| format!("Failed to open database: {}", settings.database_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_with_overrides() {
        let cli = Cli::try_parse_from([
            "aquifer-import",
            "--database-url",
            "sqlite::memory:",
            "import",
            "2018",
            "--tolerance",
            "2.5",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.campaign, "2018");
                assert_eq!(args.run.tolerance, Some(2.5));
                assert!(args.run.json);
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_catalog_list() {
        let cli = Cli::try_parse_from(["aquifer-import", "catalog", "list", "GA_calidad_2001"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Catalog(CatalogCommands::List { ref campaign }) if campaign == "GA_calidad_2001"
        ));
    }

    #[test]
    fn test_import_requires_campaign() {
        assert!(Cli::try_parse_from(["aquifer-import", "import"]).is_err());
    }
}
