//! Spreadsheet date serial decoding (1900 date system)

use chrono::{Days, NaiveDate};

/// Largest serial that still maps to a four-digit year (9999-12-31)
const MAX_SERIAL: f64 = 2_958_465.0;

/// Serial 60 is the phantom 1900-02-29 kept for Lotus 1-2-3 compatibility
const PHANTOM_LEAP_DAY: i64 = 60;

/// Decode a spreadsheet date serial; the fractional (time) part is ignored
///
/// Returns `None` for serials before 1900-01-01, past 9999-12-31, and for the
/// nonexistent 1900-02-29.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL + 0.999_999).contains(&serial) {
        return None;
    }

    let days = serial.floor() as i64;
    if days == PHANTOM_LEAP_DAY {
        return None;
    }

    let offset = if days > PHANTOM_LEAP_DAY { days - 1 } else { days };
    NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_days(Days::new(offset as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_serials() {
        assert_eq!(excel_serial_to_date(1.0), Some(ymd(1900, 1, 1)));
        assert_eq!(excel_serial_to_date(59.0), Some(ymd(1900, 2, 28)));
        assert_eq!(excel_serial_to_date(61.0), Some(ymd(1900, 3, 1)));
        assert_eq!(excel_serial_to_date(36526.0), Some(ymd(2000, 1, 1)));
        assert_eq!(excel_serial_to_date(44927.75), Some(ymd(2023, 1, 1)));
        assert_eq!(excel_serial_to_date(MAX_SERIAL), Some(ymd(9999, 12, 31)));
    }

    #[test]
    fn test_invalid_serials() {
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(60.0), None);
        assert_eq!(excel_serial_to_date(-12.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(MAX_SERIAL + 1.0), None);
    }
}
