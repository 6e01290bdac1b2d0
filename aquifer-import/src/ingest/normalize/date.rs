//! Date normalization with strict, campaign-configurable formats
//!
//! Formats use the tokens `YYYY`, `YY`, `MM`, `M`, `DD` and `D`; any other
//! non-letter character is a literal separator. Matching is strict: every
//! character of the input must be consumed, fixed-width tokens need exactly
//! their width in digits, and the resulting calendar date must exist.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ingest::excel::excel_serial_to_date;
use crate::ingest::types::CellValue;

/// One piece of a date format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    Month2,
    Month,
    Day2,
    Day,
    Literal(char),
}

/// Error when parsing a date format pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    /// Pattern is empty
    Empty,
    /// Letter sequence that is not a known token
    UnknownToken { pattern: String, position: usize },
    /// Year, month or day missing or repeated
    BadFieldCount { pattern: String, field: &'static str },
}

impl std::fmt::Display for DateFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateFormatError::Empty => write!(f, "date format cannot be empty"),
            DateFormatError::UnknownToken { pattern, position } => write!(
                f,
                "unknown token at position {} in date format '{}' (use YYYY, YY, MM, M, DD, D)",
                position, pattern
            ),
            DateFormatError::BadFieldCount { pattern, field } => write!(
                f,
                "date format '{}' must contain exactly one {} token",
                pattern, field
            ),
        }
    }
}

impl std::error::Error for DateFormatError {}

/// A compiled strict date format such as `DD/MM/YYYY`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<Token>,
}

impl DateFormat {
    /// Compile a pattern
    pub fn parse(pattern: &str) -> Result<Self, DateFormatError> {
        if pattern.is_empty() {
            return Err(DateFormatError::Empty);
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let rest: String = chars[i..].iter().collect();
            let (token, width) = if rest.starts_with("YYYY") {
                (Token::Year4, 4)
            } else if rest.starts_with("YY") {
                (Token::Year2, 2)
            } else if rest.starts_with("MM") {
                (Token::Month2, 2)
            } else if rest.starts_with('M') {
                (Token::Month, 1)
            } else if rest.starts_with("DD") {
                (Token::Day2, 2)
            } else if rest.starts_with('D') {
                (Token::Day, 1)
            } else if chars[i].is_alphabetic() {
                return Err(DateFormatError::UnknownToken {
                    pattern: pattern.to_string(),
                    position: i,
                });
            } else {
                (Token::Literal(chars[i]), 1)
            };
            tokens.push(token);
            i += width;
        }

        let count = |pred: fn(&Token) -> bool| tokens.iter().filter(|t| pred(*t)).count();
        for (field, n) in [
            ("year", count(|t| matches!(t, Token::Year4 | Token::Year2))),
            ("month", count(|t| matches!(t, Token::Month2 | Token::Month))),
            ("day", count(|t| matches!(t, Token::Day2 | Token::Day))),
        ] {
            if n != 1 {
                return Err(DateFormatError::BadFieldCount {
                    pattern: pattern.to_string(),
                    field,
                });
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Strictly parse `input` against this format
    pub fn parse_date(&self, input: &str) -> Option<NaiveDate> {
        let bytes = input.as_bytes();
        let mut pos = 0;
        let (mut year, mut month, mut day) = (None, None, None);

        for token in &self.tokens {
            match token {
                Token::Literal(c) => {
                    let mut buf = [0u8; 4];
                    let lit = c.encode_utf8(&mut buf).as_bytes();
                    if !bytes[pos..].starts_with(lit) {
                        return None;
                    }
                    pos += lit.len();
                }
                Token::Year4 => {
                    let (n, used) = take_digits(&bytes[pos..], 4, 4)?;
                    year = Some(n as i32);
                    pos += used;
                }
                Token::Year2 => {
                    let (n, used) = take_digits(&bytes[pos..], 2, 2)?;
                    year = Some(expand_two_digit_year(n));
                    pos += used;
                }
                Token::Month2 | Token::Day2 => {
                    let (n, used) = take_digits(&bytes[pos..], 2, 2)?;
                    if matches!(token, Token::Month2) {
                        month = Some(n);
                    } else {
                        day = Some(n);
                    }
                    pos += used;
                }
                Token::Month | Token::Day => {
                    let (n, used) = take_digits(&bytes[pos..], 1, 2)?;
                    if matches!(token, Token::Month) {
                        month = Some(n);
                    } else {
                        day = Some(n);
                    }
                    pos += used;
                }
            }
        }

        if pos != bytes.len() {
            return None;
        }
        NaiveDate::from_ymd_opt(year?, month?, day?)
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

impl TryFrom<String> for DateFormat {
    type Error = DateFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DateFormat::parse(&value)
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.pattern
    }
}

/// Greedily read between `min` and `max` ASCII digits
fn take_digits(bytes: &[u8], min: usize, max: usize) -> Option<(u32, usize)> {
    let len = bytes
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len < min {
        return None;
    }
    let n = bytes[..len]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    Some((n, len))
}

/// 00-68 -> 2000s, 69-99 -> 1900s
fn expand_two_digit_year(n: u32) -> i32 {
    if n <= 68 { 2000 + n as i32 } else { 1900 + n as i32 }
}

/// Normalize a raw cell into a calendar date
///
/// Date cells are returned as is, numeric cells are decoded as spreadsheet
/// date serials, and text is tried against `formats` in order. Returns `None`
/// when nothing matches; choosing a default is up to the caller.
pub fn normalize_date(raw: &CellValue, formats: &[DateFormat]) -> Option<NaiveDate> {
    let text = match raw {
        CellValue::Empty => return None,
        CellValue::Date(d) => return Some(*d),
        CellValue::Number(serial) => {
            if let Some(date) = excel_serial_to_date(*serial) {
                return Some(date);
            }
            serial.to_string()
        }
        CellValue::Text(s) => s.clone(),
        CellValue::Bool(_) => return None,
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats.iter().find_map(|f| f.parse_date(trimmed))
}

/// January 1st of a year, the default for year-only sampling events
pub fn first_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Year of a date as stored on sampling events
pub fn year_of(date: NaiveDate) -> i32 {
    date.year()
}
