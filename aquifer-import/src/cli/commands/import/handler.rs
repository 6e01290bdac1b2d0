//! Import command handlers

use anyhow::{Context, Result};
use colored::*;

use super::{ImportAllArgs, ImportArgs, RunOptions};
use crate::config::Settings;
use crate::error::ImportError;
use crate::ingest::pipeline::{RunSummary, run_import};

/// Import a single campaign
pub async fn handle_import_command(args: ImportArgs, mut settings: Settings) -> Result<()> {
    apply_run_options(&mut settings, &args.run)?;

    let profile = settings
        .campaign(&args.campaign)
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown campaign '{}'. Use 'aquifer-import campaigns' to list them.",
                args.campaign
            )
        })?;

    let pool = crate::cli::open_store(&settings).await?;
    let summary = run_import(&pool, &settings, &profile, args.file.as_deref())
        .await
        .with_context(|| format!("Import of campaign '{}' failed", profile.name))?;

    if args.run.json {
        println!("{}", to_json(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Import every configured campaign; a missing workbook skips that campaign
pub async fn handle_import_all_command(args: ImportAllArgs, mut settings: Settings) -> Result<()> {
    apply_run_options(&mut settings, &args.run)?;
    let pool = crate::cli::open_store(&settings).await?;

    let mut summaries = Vec::new();
    let mut run_errors = 0usize;

    for profile in &settings.campaigns {
        match run_import(&pool, &settings, profile, None).await {
            Ok(summary) => summaries.push(summary),
            Err(err @ ImportError::UnresolvedFile { .. }) => {
                log::warn!("Skipping campaign '{}': {}", profile.name, err);
                if !args.run.json {
                    println!("{} {}", "Skipped".yellow().bold(), err);
                }
            }
            Err(err) => {
                log::error!("Campaign '{}' aborted: {}", profile.name, err);
                if !args.run.json {
                    println!("{} {}: {}", "Aborted".red().bold(), profile.name, err);
                }
                run_errors += 1;
            }
        }
    }

    if args.run.json {
        println!("{}", to_json(&summaries)?);
    } else {
        for summary in &summaries {
            print_summary(summary);
        }
    }

    if run_errors > 0 {
        anyhow::bail!("{} campaign(s) could not be imported", run_errors);
    }
    Ok(())
}

fn apply_run_options(settings: &mut Settings, options: &RunOptions) -> Result<()> {
    if let Some(dir) = &options.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(tolerance) = options.tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            anyhow::bail!("--tolerance must be a non-negative number, got {}", tolerance);
        }
        settings.tolerance_override = Some(tolerance);
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format JSON output")
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{} {}", "Campaign".bold(), summary.campaign.bright_cyan().bold());
    println!("  Rows:      {}", summary.total_rows());
    println!("  Processed: {}", summary.processed.to_string().green());

    let failed = summary.failed.to_string();
    if summary.has_failures() {
        println!("  Failed:    {}", failed.red().bold());
    } else {
        println!("  Failed:    {}", failed.dimmed());
    }

    if !summary.unmapped_columns.is_empty() {
        println!("  Unmapped columns ({}):", summary.unmapped_columns.len());
        for column in &summary.unmapped_columns {
            println!("    {}", column.yellow());
        }
    }

    for failure in &summary.failures {
        println!(
            "  {} {}",
            format!("Row {}:", failure.row_number).red(),
            failure.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_run_options_override_settings() {
        let mut settings = Settings::default();
        let options = RunOptions {
            data_dir: Some(PathBuf::from("/srv/surveys")),
            tolerance: Some(3.0),
            json: false,
        };
        apply_run_options(&mut settings, &options).unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/srv/surveys"));
        let profile = settings.campaign("2001").unwrap();
        assert_eq!(settings.tolerance_for(profile), 3.0);
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let mut settings = Settings::default();
        let options = RunOptions {
            data_dir: None,
            tolerance: Some(-1.0),
            json: true,
        };
        assert!(apply_run_options(&mut settings, &options).is_err());
        assert_eq!(settings.tolerance_override, None);
    }
}
