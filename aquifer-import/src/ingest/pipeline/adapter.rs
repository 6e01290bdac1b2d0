//! Campaign adapter: one loosely-typed row into a typed record

use chrono::NaiveDate;

use crate::config::{CampaignProfile, DatePolicy};
use crate::ingest::normalize::{first_of_year, normalize_date, normalize_number, year_of};
use crate::ingest::types::{CellValue, RawRow, WellInput};

/// A spreadsheet row split into well data, sample key and parameter cells
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    pub well: WellInput,
    pub sample_date: Option<NaiveDate>,
    pub year: Option<i32>,
    /// Non-meta columns in sheet order, raw header kept
    pub parameters: Vec<(String, CellValue)>,
}

/// Build a record from a row using the campaign's column layout and date policy
pub fn adapt_row(profile: &CampaignProfile, row: &RawRow) -> CampaignRecord {
    let meta = &profile.meta;
    let text = |column: &Option<String>| cell(row, column).and_then(CellValue::as_text);
    let number = |column: &Option<String>| cell(row, column).and_then(normalize_number);
    let parsed_date = || cell(row, &meta.date).and_then(|c| normalize_date(c, &profile.date_formats));

    let well = WellInput {
        well_code: text(&meta.well_code),
        source_code: Some(profile.name.clone()),
        district: text(&meta.district),
        locality: text(&meta.locality),
        x: number(&meta.x),
        y: number(&meta.y),
        elevation_m: number(&meta.elevation),
        depth_m: number(&meta.depth),
    };

    let (sample_date, year) = match profile.date_policy {
        DatePolicy::Dated => {
            let date = parsed_date();
            let year = date.map(year_of).unwrap_or(profile.default_year);
            (date, year)
        }
        DatePolicy::DatedFilled => {
            let date = parsed_date();
            let year = date.map(year_of).unwrap_or(profile.default_year);
            (date.or_else(|| first_of_year(year)), year)
        }
        DatePolicy::YearOnly => {
            let year = number(&meta.year)
                .map(f64::trunc)
                .filter(|y| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(y))
                .map(|y| y as i32)
                .unwrap_or(profile.default_year);
            (first_of_year(year), year)
        }
    };

    let meta_columns = profile.meta_column_names();
    let parameters = row
        .iter()
        .filter(|(header, _)| !meta_columns.contains(header))
        .map(|(header, value)| (header.to_string(), value.clone()))
        .collect();

    CampaignRecord {
        well,
        sample_date,
        year: Some(year),
        parameters,
    }
}

fn cell<'r>(row: &'r RawRow, column: &Option<String>) -> Option<&'r CellValue> {
    column.as_deref().map(|header| row.get(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_2001_row() {
        let profile = CampaignProfile::builtin("GA_calidad_2001").unwrap();
        let row = RawRow::new()
            .with("No", 1.0)
            .with("Codigo", " P-12 ")
            .with("Localidad", "San Lorenzo")
            .with("X-UTM", "441200,5")
            .with("Y-UTM", 7195000.0)
            .with("Prof_M", 80.0)
            .with("Fecha_mues", "15/03/2001")
            .with("Nitratos (mg/L)", 12.5);

        let record = adapt_row(&profile, &row);
        assert_eq!(record.well.well_code.as_deref(), Some("P-12"));
        assert_eq!(record.well.source_code.as_deref(), Some("GA_calidad_2001"));
        assert_eq!(record.well.x, Some(441200.5));
        assert_eq!(record.well.depth_m, Some(80.0));
        assert_eq!(record.sample_date, Some(date(2001, 3, 15)));
        assert_eq!(record.year, Some(2001));
        assert_eq!(
            record.parameters,
            vec![("Nitratos (mg/L)".to_string(), CellValue::Number(12.5))]
        );
    }

    #[test]
    fn test_dated_row_without_date_keeps_it_empty() {
        let profile = CampaignProfile::builtin("GA_calidad_2001").unwrap();
        let row = RawRow::new().with("Codigo", "P-1").with("Fecha_mues", "sin dato");

        let record = adapt_row(&profile, &row);
        assert_eq!(record.sample_date, None);
        assert_eq!(record.year, Some(2001));
    }

    #[test]
    fn test_year_only_row_defaults() {
        let profile = CampaignProfile::builtin("GA_calidad_tesis_2006").unwrap();

        let with_year = RawRow::new().with("Distrito", "Luque").with("Año", 2005.0);
        let record = adapt_row(&profile, &with_year);
        assert_eq!(record.year, Some(2005));
        assert_eq!(record.sample_date, Some(date(2005, 1, 1)));
        assert_eq!(record.well.district.as_deref(), Some("Luque"));
        assert_eq!(record.well.well_code, None);

        let without_year = RawRow::new().with("Distrito", "Luque").with("Año", "");
        let record = adapt_row(&profile, &without_year);
        assert_eq!(record.year, Some(2006));
        assert_eq!(record.sample_date, Some(date(2006, 1, 1)));
    }

    #[test]
    fn test_dated_filled_uses_first_of_year() {
        let profile = CampaignProfile::builtin("GA_calidad_FP_2018").unwrap();

        let undated = RawRow::new().with("codigo_pozo", 7.0).with("ele", 110.0);
        let record = adapt_row(&profile, &undated);
        assert_eq!(record.well.well_code.as_deref(), Some("7"));
        assert_eq!(record.well.elevation_m, Some(110.0));
        assert_eq!(record.sample_date, Some(date(2018, 1, 1)));
        assert_eq!(record.year, Some(2018));

        let dated = RawRow::new().with("Fecha_muestreo", "3-7-2017");
        let record = adapt_row(&profile, &dated);
        assert_eq!(record.sample_date, Some(date(2017, 7, 3)));
        assert_eq!(record.year, Some(2017));
    }
}
