//! Numeric normalization

use crate::ingest::types::CellValue;

/// Normalize a raw cell into a finite number
///
/// Native numbers pass through unchanged. Text is trimmed and a comma decimal
/// separator is accepted (`"7,25"` -> `7.25`). Anything else yields `None`.
pub fn normalize_number(raw: &CellValue) -> Option<f64> {
    match raw {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_decimal(s),
        CellValue::Empty | CellValue::Bool(_) | CellValue::Date(_) => None,
    }
}

/// Parse decimal text, replacing the first comma with a period
pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_number_passes_through() {
        assert_eq!(normalize_number(&CellValue::Number(7.2)), Some(7.2));
        assert_eq!(normalize_number(&CellValue::Number(-0.5)), Some(-0.5));
    }

    #[test]
    fn test_text_with_comma_separator() {
        assert_eq!(normalize_number(&" 7,25 ".into()), Some(7.25));
        assert_eq!(normalize_number(&"350".into()), Some(350.0));
        assert_eq!(normalize_number(&"1e3".into()), Some(1000.0));
    }

    #[test]
    fn test_unparseable_and_empty_yield_none() {
        assert_eq!(normalize_number(&CellValue::Empty), None);
        assert_eq!(normalize_number(&"".into()), None);
        assert_eq!(normalize_number(&"   ".into()), None);
        assert_eq!(normalize_number(&"<0.01".into()), None);
        assert_eq!(normalize_number(&"inf".into()), None);
        assert_eq!(normalize_number(&"NaN".into()), None);
        assert_eq!(normalize_number(&"1,234,5".into()), None);
        assert_eq!(normalize_number(&CellValue::Bool(true)), None);
    }
}
