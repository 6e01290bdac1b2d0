//! Import reconciliation engine for groundwater-quality survey spreadsheets
//!
//! Rows from heterogeneous campaign workbooks are matched against existing
//! wells (by identifier, then by location), attached to sampling events and
//! stored as per-parameter measurements, one transaction per row.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod services;
pub mod store;

pub use error::{ImportError, ImportResult};
