//! Runtime settings: database, data directory and campaign profiles
//!
//! Precedence, lowest to highest: built-in defaults, `.env` / environment
//! variables, the campaigns TOML file, command-line flags.

mod campaign;

pub use campaign::{CampaignProfile, DEFAULT_SPATIAL_TOLERANCE, DatePolicy, MetaColumns};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://aquifer.db";
pub const DEFAULT_DATA_DIR: &str = "data";

const DATABASE_URL_VAR: &str = "DATABASE_URL";
const DATA_DIR_VAR: &str = "AQUIFER_DATA_DIR";

/// Shape of the campaigns TOML file
#[derive(Debug, Default, Deserialize)]
struct CampaignsFile {
    #[serde(default)]
    campaigns: Vec<CampaignProfile>,
}

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub data_dir: PathBuf,
    /// Overrides every campaign's spatial tolerance when set
    pub tolerance_override: Option<f64>,
    pub campaigns: Vec<CampaignProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            tolerance_override: None,
            campaigns: CampaignProfile::builtins(),
        }
    }
}

impl Settings {
    /// Load settings from the environment and an optional campaigns file
    ///
    /// When `config_path` is `None`, `<config_dir>/aquifer-import/campaigns.toml`
    /// is used if it exists.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Ok(url) = std::env::var(DATABASE_URL_VAR) {
            if !url.trim().is_empty() {
                settings.database_url = url;
            }
        }
        if let Ok(dir) = std::env::var(DATA_DIR_VAR) {
            if !dir.trim().is_empty() {
                settings.data_dir = PathBuf::from(dir);
            }
        }

        let path = match config_path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.is_file()),
        };

        if let Some(path) = path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read campaigns file: {}", path.display()))?;
            let overrides = parse_campaigns(&content)
                .with_context(|| format!("Invalid campaigns file: {}", path.display()))?;
            log::info!(
                "Loaded {} campaign profile(s) from {}",
                overrides.len(),
                path.display()
            );
            settings.merge_campaigns(overrides);
        }

        Ok(settings)
    }

    /// Replace same-named profiles, append new ones
    pub fn merge_campaigns(&mut self, overrides: Vec<CampaignProfile>) {
        for profile in overrides {
            match self.campaigns.iter_mut().find(|p| p.name == profile.name) {
                Some(existing) => *existing = profile,
                None => self.campaigns.push(profile),
            }
        }
    }

    /// Find a campaign by exact name, or by a unique name suffix such as `2018`
    pub fn campaign(&self, name: &str) -> Option<&CampaignProfile> {
        if let Some(profile) = self.campaigns.iter().find(|p| p.name == name) {
            return Some(profile);
        }
        let suffix = format!("_{}", name);
        let mut matches = self.campaigns.iter().filter(|p| p.name.ends_with(&suffix));
        match (matches.next(), matches.next()) {
            (Some(profile), None) => Some(profile),
            _ => None,
        }
    }

    /// Spatial tolerance to use for a campaign
    pub fn tolerance_for(&self, profile: &CampaignProfile) -> f64 {
        self.tolerance_override.unwrap_or(profile.spatial_tolerance)
    }
}

/// Parse and validate campaign profiles from TOML
pub fn parse_campaigns(content: &str) -> Result<Vec<CampaignProfile>> {
    let file: CampaignsFile = toml::from_str(content).context("Failed to parse TOML")?;
    for profile in &file.campaigns {
        profile.validate()?;
    }
    Ok(file.campaigns)
}

/// `<config_dir>/aquifer-import/campaigns.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aquifer-import").join("campaigns.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.campaigns.len(), 3);
    }

    #[test]
    fn test_campaign_lookup_by_suffix() {
        let settings = Settings::default();
        assert_eq!(
            settings.campaign("2018").map(|p| p.name.as_str()),
            Some("GA_calidad_FP_2018")
        );
        assert_eq!(
            settings.campaign("GA_calidad_2001").map(|p| p.name.as_str()),
            Some("GA_calidad_2001")
        );
        assert!(settings.campaign("1999").is_none());
    }

    #[test]
    fn test_merge_campaigns_replaces_and_appends() {
        let mut settings = Settings::default();
        let overrides = parse_campaigns(
            r#"
            [[campaigns]]
            name = "GA_calidad_2001"
            default_year = 2001
            spatial_tolerance = 5.0
            [campaigns.meta]
            well_code = "Codigo"
            date = "Fecha_mues"

            [[campaigns]]
            name = "GA_calidad_2024"
            default_year = 2024
            date_policy = "year_only"
            [campaigns.meta]
            year = "Anio"
            "#,
        )
        .unwrap();
        settings.merge_campaigns(overrides);

        assert_eq!(settings.campaigns.len(), 4);
        let p2001 = settings.campaign("2001").unwrap().clone();
        assert_eq!(p2001.spatial_tolerance, 5.0);
        assert_eq!(settings.tolerance_for(&p2001), 5.0);

        settings.tolerance_override = Some(0.5);
        assert_eq!(settings.tolerance_for(&p2001), 0.5);
        assert!(settings.campaign("2024").is_some());
    }

    #[test]
    fn test_parse_campaigns_validates() {
        let result = parse_campaigns(
            r#"
            [[campaigns]]
            name = "GA_calidad_2024"
            default_year = 2024
            date_policy = "year_only"
            "#,
        );
        assert!(result.is_err());
    }
}
