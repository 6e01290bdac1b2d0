//! Alias resolution: column header -> canonical parameter code

use std::collections::{BTreeMap, HashMap};

use sqlx::SqliteConnection;

use crate::error::ImportResult;
use crate::ingest::normalize::parse_header;
use crate::ingest::types::{ParameterAlias, ParameterInfo};
use crate::store::repository::aliases;

/// Which step of the lookup chain matched a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    Exact,    // Raw header, untrimmed
    Trimmed,  // Header with surrounding whitespace removed
    Alias,    // Header with its trailing "(unit)" removed
    Fallback, // Campaign's hard-coded synonym table
}

impl LookupStage {
    pub fn label(&self) -> &'static str {
        match self {
            LookupStage::Exact => "[Exact]",
            LookupStage::Trimmed => "[Trimmed]",
            LookupStage::Alias => "[Alias]",
            LookupStage::Fallback => "[Fallback]",
        }
    }
}

/// A header resolved to a parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub param_code: String,
    /// Unit hint from the header, recorded as the measurement's original unit
    pub original_unit: Option<String>,
    pub stage: LookupStage,
}

/// Outcome of resolving one column header
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnLookup {
    Mapped(ColumnMapping),
    /// No alias matched; carries the trimmed header for the run report
    Unmapped(String),
    /// Header is blank or only a unit; not a parameter column
    Skipped,
}

/// Alias -> parameter table for one campaign, built once per run
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: HashMap<String, ParameterInfo>,
}

impl AliasMap {
    /// Build from alias rows; campaign-specific aliases shadow generic ones
    ///
    /// Rows belonging to other campaigns are ignored. Within the same
    /// precedence level the first row for an alias wins.
    pub fn from_aliases(
        campaign: &str,
        rows: impl IntoIterator<Item = ParameterAlias>,
    ) -> Self {
        let mut rows: Vec<ParameterAlias> = rows
            .into_iter()
            .filter(|r| r.campaign.as_deref().is_none_or(|c| c == campaign))
            .collect();
        // Stable: keeps the incoming order inside each group
        rows.sort_by_key(|r| r.campaign.is_none());

        let mut entries: HashMap<String, ParameterInfo> = HashMap::new();
        let mut shadowed = 0usize;
        for row in &rows {
            if entries.contains_key(&row.alias) {
                shadowed += 1;
            } else {
                entries.insert(row.alias.clone(), ParameterInfo::from(row));
            }
        }

        if shadowed > 0 {
            log::debug!(
                "Alias map for '{}': {} alias rows shadowed by earlier entries",
                campaign,
                shadowed
            );
        }

        Self { entries }
    }

    /// Load the alias table for a campaign from the store
    pub async fn load(conn: &mut SqliteConnection, campaign: &str) -> ImportResult<Self> {
        let rows = aliases::load_for_campaign(conn, campaign).await?;
        let map = Self::from_aliases(campaign, rows);
        log::info!(
            "Alias map for '{}' built with {} unique aliases",
            campaign,
            map.len()
        );
        Ok(map)
    }

    pub fn get(&self, alias: &str) -> Option<&ParameterInfo> {
        self.entries.get(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by alias, for display
    pub fn sorted_entries(&self) -> Vec<(&str, &ParameterInfo)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(alias, info)| (alias.as_str(), info))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Resolve a column header
    ///
    /// Order: exact header, trimmed header, header without its unit, then
    /// the campaign fallback table (trimmed header, then alias).
    pub fn resolve(&self, header: &str, fallback: &BTreeMap<String, String>) -> ColumnLookup {
        let parts = parse_header(header);
        let Some(alias) = parts.alias else {
            return ColumnLookup::Skipped;
        };
        let trimmed = header.trim();

        let mapped = |param_code: &str, stage| {
            ColumnLookup::Mapped(ColumnMapping {
                param_code: param_code.to_string(),
                original_unit: parts.unit_hint.clone(),
                stage,
            })
        };

        if let Some(info) = self.entries.get(header) {
            return mapped(&info.param_code, LookupStage::Exact);
        }
        if let Some(info) = self.entries.get(trimmed) {
            return mapped(&info.param_code, LookupStage::Trimmed);
        }
        if let Some(info) = self.entries.get(&alias) {
            return mapped(&info.param_code, LookupStage::Alias);
        }
        if let Some(code) = fallback.get(trimmed).or_else(|| fallback.get(&alias)) {
            return mapped(code, LookupStage::Fallback);
        }

        ColumnLookup::Unmapped(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(alias: &str, campaign: Option<&str>, code: &str) -> ParameterAlias {
        ParameterAlias {
            alias: alias.to_string(),
            campaign: campaign.map(str::to_string),
            param_code: code.to_string(),
            standard_unit: Some("mg/L".to_string()),
            param_name: code.to_string(),
        }
    }

    fn code_of(lookup: ColumnLookup) -> Option<String> {
        match lookup {
            ColumnLookup::Mapped(m) => Some(m.param_code),
            _ => None,
        }
    }

    #[test]
    fn test_campaign_alias_shadows_generic() {
        let rows = vec![
            alias("Cl", None, "chloride"),
            alias("Cl", Some("X"), "chloride_alt"),
            alias("Cl", Some("Y"), "chloride_y"),
        ];
        let none = BTreeMap::new();

        let for_x = AliasMap::from_aliases("X", rows.clone());
        assert_eq!(code_of(for_x.resolve("Cl", &none)).as_deref(), Some("chloride_alt"));

        let for_z = AliasMap::from_aliases("Z", rows);
        assert_eq!(code_of(for_z.resolve("Cl", &none)).as_deref(), Some("chloride"));
        assert_eq!(for_z.len(), 1);
    }

    #[test]
    fn test_lookup_chain_order() {
        let map = AliasMap::from_aliases(
            "X",
            vec![
                alias(" Na (mg/L)", None, "sodium_exact"),
                alias("K (mg/L)", None, "potassium_trimmed"),
                alias("Ca", None, "calcium"),
            ],
        );
        let none = BTreeMap::new();

        match map.resolve(" Na (mg/L)", &none) {
            ColumnLookup::Mapped(m) => {
                assert_eq!(m.param_code, "sodium_exact");
                assert_eq!(m.stage, LookupStage::Exact);
                assert_eq!(m.original_unit.as_deref(), Some("mg/L"));
            }
            other => panic!("unexpected lookup: {other:?}"),
        }

        match map.resolve("  K (mg/L) ", &none) {
            ColumnLookup::Mapped(m) => assert_eq!(m.stage, LookupStage::Trimmed),
            other => panic!("unexpected lookup: {other:?}"),
        }

        match map.resolve("Ca (meq/L)", &none) {
            ColumnLookup::Mapped(m) => {
                assert_eq!(m.param_code, "calcium");
                assert_eq!(m.stage, LookupStage::Alias);
                assert_eq!(m.original_unit.as_deref(), Some("meq/L"));
            }
            other => panic!("unexpected lookup: {other:?}"),
        }
    }

    #[test]
    fn test_fallback_and_unmapped() {
        let map = AliasMap::from_aliases("X", Vec::new());
        let fallback = BTreeMap::from([("pH".to_string(), "ph".to_string())]);

        match map.resolve(" pH ", &fallback) {
            ColumnLookup::Mapped(m) => {
                assert_eq!(m.param_code, "ph");
                assert_eq!(m.stage, LookupStage::Fallback);
            }
            other => panic!("unexpected lookup: {other:?}"),
        }
        assert_eq!(
            code_of(map.resolve("pH (unid.)", &fallback)).as_deref(),
            Some("ph")
        );
        assert_eq!(
            map.resolve(" Turbidez ", &fallback),
            ColumnLookup::Unmapped("Turbidez".to_string())
        );
        assert_eq!(map.resolve("   ", &fallback), ColumnLookup::Skipped);
        assert_eq!(map.resolve("(mg/L)", &fallback), ColumnLookup::Skipped);
    }

    #[test]
    fn test_first_row_wins_within_generic_aliases() {
        let map = AliasMap::from_aliases(
            "X",
            vec![alias("NO3", None, "nitrate"), alias("NO3", None, "nitrate_dup")],
        );
        assert_eq!(map.get("NO3").map(|i| i.param_code.as_str()), Some("nitrate"));
    }
}
