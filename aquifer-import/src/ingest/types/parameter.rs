//! Parameter catalog and alias reference data

use serde::{Deserialize, Serialize};

/// One permitted header spelling of a parameter
///
/// `campaign == None` marks a generic alias; a campaign-specific alias
/// shadows the generic one for that campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAlias {
    pub alias: String,
    pub campaign: Option<String>,
    pub param_code: String,
    pub standard_unit: Option<String>,
    pub param_name: String,
}

/// Canonical parameter metadata an alias resolves to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub param_code: String,
    pub standard_unit: Option<String>,
    pub param_name: String,
}

/// A catalog entry for a canonical parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub param_code: String,
    pub param_name: String,
    pub standard_unit: Option<String>,
}

impl From<&ParameterAlias> for ParameterInfo {
    fn from(alias: &ParameterAlias) -> Self {
        Self {
            param_code: alias.param_code.clone(),
            standard_unit: alias.standard_unit.clone(),
            param_name: alias.param_name.clone(),
        }
    }
}
