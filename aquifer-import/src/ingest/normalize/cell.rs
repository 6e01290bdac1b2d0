//! Measurement cell normalization

use super::number::parse_decimal;
use crate::ingest::types::CellValue;

/// A normalized measurement cell: a number or free text, or neither
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellReading {
    pub value: Option<f64>,
    pub text: Option<String>,
}

impl CellReading {
    /// True when the cell contributes no measurement
    pub fn is_blank(&self) -> bool {
        self.value.is_none() && self.text.is_none()
    }
}

/// Split a raw cell into a numeric value or a text value
pub fn normalize_cell(raw: &CellValue) -> CellReading {
    match raw {
        CellValue::Empty => CellReading::default(),
        CellValue::Number(n) => CellReading {
            value: Some(*n),
            text: None,
        },
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return CellReading::default();
            }
            match parse_decimal(trimmed) {
                Some(n) => CellReading {
                    value: Some(n),
                    text: None,
                },
                None => CellReading {
                    value: None,
                    text: Some(trimmed.to_string()),
                },
            }
        }
        CellValue::Bool(_) | CellValue::Date(_) => CellReading {
            value: None,
            text: raw.as_text(),
        },
    }
}
