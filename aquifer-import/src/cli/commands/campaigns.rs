//! `campaigns` command: list the configured campaign profiles

use anyhow::Result;
use colored::*;

use crate::config::{DatePolicy, Settings};

pub fn handle_campaigns_command(settings: &Settings) -> Result<()> {
    println!(
        "{} {}",
        "Data directory:".bold(),
        settings.data_dir.display().to_string().cyan()
    );

    for profile in &settings.campaigns {
        let policy = match profile.date_policy {
            DatePolicy::Dated => "dated",
            DatePolicy::DatedFilled => "dated (filled)",
            DatePolicy::YearOnly => "year only",
        };
        println!();
        println!("{}", profile.name.bright_cyan().bold());
        println!(
            "  Dates: {}, default year {}",
            policy,
            profile.default_year
        );
        if !profile.date_formats.is_empty() {
            let formats: Vec<String> =
                profile.date_formats.iter().map(|f| f.to_string()).collect();
            println!("  Date formats: {}", formats.join(", "));
        }
        println!("  Tolerance: {}", settings.tolerance_for(profile));

        let found = profile
            .source_candidates(&settings.data_dir)
            .into_iter()
            .find(|p| p.is_file());
        match found {
            Some(path) => println!("  Workbook: {}", path.display().to_string().green()),
            None => println!("  Workbook: {}", "not found".yellow()),
        }
    }

    Ok(())
}
