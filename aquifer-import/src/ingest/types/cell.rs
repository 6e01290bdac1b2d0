//! Raw spreadsheet cell values and rows

use chrono::NaiveDate;

/// A raw cell as delivered by the workbook reader
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or blank cell
    #[default]
    Empty,
    /// Native numeric cell
    Number(f64),
    /// Text cell (untrimmed, as stored in the sheet)
    Text(String),
    /// Boolean cell
    Bool(bool),
    /// Date-typed cell, already materialized by the reader
    Date(NaiveDate),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Check if this cell carries nothing (blank text counts as empty)
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as trimmed text, `None` when blank
    ///
    /// Integral numbers drop their fractional part so that a well code typed
    /// as `12` in one sheet and `"12"` in another compare equal.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some((*n as i64).to_string())
                } else {
                    Some(n.to_string())
                }
            }
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// One spreadsheet row: header -> cell, in sheet column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based sheet row number, when known
    sheet_row: Option<usize>,
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row that remembers where it sits in the sheet
    pub fn at_sheet_row(sheet_row: usize) -> Self {
        Self {
            sheet_row: Some(sheet_row),
            cells: Vec::new(),
        }
    }

    /// Builder-style append
    pub fn with(mut self, header: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(header, value);
        self
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((header.into(), value.into()));
    }

    /// Cell under an exact header; missing headers read as empty
    pub fn get(&self, header: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn sheet_row(&self) -> Option<usize> {
        self.sheet_row
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_formats_integral_numbers() {
        assert_eq!(CellValue::Number(12.0).as_text(), Some("12".into()));
        assert_eq!(CellValue::Number(12.5).as_text(), Some("12.5".into()));
        assert_eq!(CellValue::Text("  P-04 ".into()).as_text(), Some("P-04".into()));
        assert_eq!(CellValue::Text("   ".into()).as_text(), None);
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn test_row_get_missing_header_is_empty() {
        let row = RawRow::new().with("Codigo", "A-1").with("pH", 7.1);
        assert_eq!(row.get("Codigo"), &CellValue::Text("A-1".into()));
        assert_eq!(row.get("Nope"), &CellValue::Empty);
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
    }
}
