//! Monitoring well records

use serde::Serialize;

/// A stored monitoring well
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Well {
    pub well_id: i64,
    pub well_code: Option<String>,
    pub source_code: Option<String>,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub elevation_m: Option<f64>,
    pub depth_m: Option<f64>,
}

/// An incoming well observation from one spreadsheet row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WellInput {
    pub well_code: Option<String>,
    pub source_code: Option<String>,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub elevation_m: Option<f64>,
    pub depth_m: Option<f64>,
}

impl WellInput {
    /// The (source_code, well_code) identifier pair, when both are known
    pub fn identifier(&self) -> Option<(&str, &str)> {
        match (&self.source_code, &self.well_code) {
            (Some(source), Some(code)) => Some((source.as_str(), code.as_str())),
            _ => None,
        }
    }

    /// Planar coordinates, when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}

impl Well {
    /// Euclidean planar distance to a point; `None` for wells without coordinates
    pub fn distance_to(&self, x: f64, y: f64) -> Option<f64> {
        match (self.x, self.y) {
            (Some(wx), Some(wy)) => Some((wx - x).hypot(wy - y)),
            _ => None,
        }
    }
}
