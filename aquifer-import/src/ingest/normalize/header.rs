//! Column header decomposition

use once_cell::sync::Lazy;
use regex::Regex;

static UNIT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*\((.*?)\)\s*$").expect("unit suffix pattern is valid")
});

/// A header split into parameter alias and unit hint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderParts {
    pub alias: Option<String>,
    pub unit_hint: Option<String>,
}

/// Split `"Cloruros (mg/L)"` into alias `Cloruros` and unit `mg/L`
///
/// Headers without a trailing parenthesized unit are used whole as the alias.
pub fn parse_header(raw: &str) -> HeaderParts {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return HeaderParts::default();
    }

    if let Some(caps) = UNIT_SUFFIX.captures(trimmed) {
        return HeaderParts {
            alias: non_empty(caps.get(1).map(|m| m.as_str())),
            unit_hint: non_empty(caps.get(2).map(|m| m.as_str())),
        };
    }

    HeaderParts {
        alias: Some(trimmed.to_string()),
        unit_hint: None,
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
