//! Per-parameter measurements

use serde::Serialize;

/// A stored measurement, keyed by (sampling_id, param_code)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub sampling_id: i64,
    pub param_code: String,
    pub value: Option<f64>,
    pub value_text: Option<String>,
    pub original_unit: Option<String>,
}

/// An incoming measurement observation
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementInput {
    pub sampling_id: i64,
    pub param_code: String,
    pub value: Option<f64>,
    pub value_text: Option<String>,
    pub original_unit: Option<String>,
}
