//! Campaign profiles: how each historical survey lays out its spreadsheet

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ImportResult};
use crate::ingest::normalize::DateFormat;

/// Default spatial match tolerance, in stored coordinate units (projected metres)
pub const DEFAULT_SPATIAL_TOLERANCE: f64 = 1.0;

/// Which header carries which well/sample attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaColumns {
    pub well_code: Option<String>,
    pub locality: Option<String>,
    pub district: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub elevation: Option<String>,
    pub depth: Option<String>,
    pub date: Option<String>,
    pub year: Option<String>,
}

impl MetaColumns {
    fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.well_code,
            &self.locality,
            &self.district,
            &self.x,
            &self.y,
            &self.elevation,
            &self.depth,
            &self.date,
            &self.year,
        ]
        .into_iter()
        .filter_map(|c| c.as_deref())
    }
}

/// How the sampling date and year of a row are derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Date from the date column; year from the date, else the default year.
    /// Unparseable dates stay empty.
    #[default]
    Dated,
    /// Like `Dated`, but a missing date becomes January 1st of the year
    DatedFilled,
    /// Only a year column; the date is always January 1st of that year
    YearOnly,
}

/// Everything the row adapter needs to know about one campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignProfile {
    /// Campaign name, also stored as the wells' source code
    pub name: String,
    /// Workbook file stems tried in order (defaults to `<name>`, `<name>_`)
    #[serde(default)]
    pub file_stems: Vec<String>,
    #[serde(default)]
    pub meta: MetaColumns,
    /// Extra columns that are neither meta data nor parameters
    #[serde(default)]
    pub ignored_columns: Vec<String>,
    #[serde(default)]
    pub date_policy: DatePolicy,
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<DateFormat>,
    /// Year assumed when a row has no usable date or year
    pub default_year: i32,
    #[serde(default = "default_tolerance")]
    pub spatial_tolerance: f64,
    /// Last-resort header -> param_code synonyms missing from the alias table
    #[serde(default)]
    pub fallback_aliases: BTreeMap<String, String>,
}

fn default_tolerance() -> f64 {
    DEFAULT_SPATIAL_TOLERANCE
}

fn default_date_formats() -> Vec<DateFormat> {
    formats(&["YYYY-MM-DD", "DD/MM/YYYY", "D/M/YYYY", "DD/MM/YY", "D/M/YY"])
}

fn formats(patterns: &[&str]) -> Vec<DateFormat> {
    patterns
        .iter()
        .filter_map(|p| DateFormat::parse(p).ok())
        .collect()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl CampaignProfile {
    /// The three historical survey campaigns
    pub fn builtins() -> Vec<CampaignProfile> {
        vec![
            CampaignProfile {
                name: "GA_calidad_2001".into(),
                file_stems: Vec::new(),
                meta: MetaColumns {
                    well_code: Some("Codigo".into()),
                    locality: Some("Localidad".into()),
                    x: Some("X-UTM".into()),
                    y: Some("Y-UTM".into()),
                    depth: Some("Prof_M".into()),
                    date: Some("Fecha_mues".into()),
                    ..Default::default()
                },
                ignored_columns: columns(&["No"]),
                date_policy: DatePolicy::Dated,
                date_formats: default_date_formats(),
                default_year: 2001,
                spatial_tolerance: DEFAULT_SPATIAL_TOLERANCE,
                fallback_aliases: BTreeMap::new(),
            },
            CampaignProfile {
                name: "GA_calidad_tesis_2006".into(),
                file_stems: Vec::new(),
                meta: MetaColumns {
                    district: Some("Distrito".into()),
                    x: Some("X".into()),
                    y: Some("Y".into()),
                    year: Some("Año".into()),
                    ..Default::default()
                },
                ignored_columns: columns(&["No", "Contaminación?"]),
                date_policy: DatePolicy::YearOnly,
                date_formats: Vec::new(),
                default_year: 2006,
                spatial_tolerance: DEFAULT_SPATIAL_TOLERANCE,
                fallback_aliases: BTreeMap::new(),
            },
            CampaignProfile {
                name: "GA_calidad_FP_2018".into(),
                file_stems: Vec::new(),
                meta: MetaColumns {
                    well_code: Some("codigo_pozo".into()),
                    locality: Some("nombre_lugar".into()),
                    x: Some("x".into()),
                    y: Some("y".into()),
                    elevation: Some("ele".into()),
                    date: Some("Fecha_muestreo".into()),
                    ..Default::default()
                },
                ignored_columns: Vec::new(),
                date_policy: DatePolicy::DatedFilled,
                date_formats: formats(&[
                    "YYYY-MM-DD",
                    "DD/MM/YYYY",
                    "D/M/YYYY",
                    "DD-MM-YYYY",
                    "D-M-YYYY",
                    "DD/MM/YY",
                    "D/M/YY",
                ]),
                default_year: 2018,
                spatial_tolerance: DEFAULT_SPATIAL_TOLERANCE,
                fallback_aliases: BTreeMap::from([("pH".to_string(), "ph".to_string())]),
            },
        ]
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Option<CampaignProfile> {
        Self::builtins().into_iter().find(|p| p.name == name)
    }

    /// All headers that never become measurements
    pub fn meta_column_names(&self) -> HashSet<&str> {
        self.meta
            .names()
            .chain(self.ignored_columns.iter().map(String::as_str))
            .collect()
    }

    /// Candidate workbook paths under `data_dir`, in lookup order
    pub fn source_candidates(&self, data_dir: &Path) -> Vec<PathBuf> {
        let stems = if self.file_stems.is_empty() {
            vec![self.name.clone(), format!("{}_", self.name)]
        } else {
            self.file_stems.clone()
        };
        stems
            .iter()
            .map(|stem| data_dir.join(format!("{}.xlsx", stem)))
            .collect()
    }

    /// Reject profiles the pipeline cannot run with
    pub fn validate(&self) -> ImportResult<()> {
        if self.name.trim().is_empty() {
            return Err(ImportError::config("campaign name cannot be empty"));
        }
        if !self.spatial_tolerance.is_finite() || self.spatial_tolerance < 0.0 {
            return Err(ImportError::config(format!(
                "campaign '{}': spatial_tolerance must be a non-negative number, got {}",
                self.name, self.spatial_tolerance
            )));
        }
        match self.date_policy {
            DatePolicy::Dated | DatePolicy::DatedFilled => {
                if self.meta.date.is_none() {
                    return Err(ImportError::config(format!(
                        "campaign '{}': date policy {:?} needs meta.date",
                        self.name, self.date_policy
                    )));
                }
                if self.date_formats.is_empty() {
                    return Err(ImportError::config(format!(
                        "campaign '{}': at least one date format is required",
                        self.name
                    )));
                }
            }
            DatePolicy::YearOnly => {
                if self.meta.year.is_none() {
                    return Err(ImportError::config(format!(
                        "campaign '{}': date policy year_only needs meta.year",
                        self.name
                    )));
                }
            }
        }
        if let Some((header, _)) = self
            .fallback_aliases
            .iter()
            .find(|(_, code)| code.trim().is_empty())
        {
            return Err(ImportError::config(format!(
                "campaign '{}': fallback alias '{}' has an empty param_code",
                self.name, header
            )));
        }
        Ok(())
    }
}
