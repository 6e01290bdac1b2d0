//! Idempotent upserts for wells, sampling events and measurements
//!
//! Every function runs on the caller's connection, normally the open
//! transaction of a single spreadsheet row.

mod measurement;
mod sample;
mod well;

pub use measurement::upsert_measurement;
pub use sample::upsert_sample;
pub use well::{WellMatch, WellUpsert, upsert_well};
