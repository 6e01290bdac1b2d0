//! Sampling events

use chrono::NaiveDate;
use serde::Serialize;

/// A stored sampling event; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingEvent {
    pub sampling_id: i64,
    pub well_id: i64,
    pub campaign: String,
    pub sample_date: Option<NaiveDate>,
    pub year: Option<i32>,
}

/// Lookup/creation key for a sampling event
#[derive(Debug, Clone, PartialEq)]
pub struct SampleInput {
    pub well_id: i64,
    pub campaign: String,
    pub sample_date: Option<NaiveDate>,
    pub year: Option<i32>,
}
