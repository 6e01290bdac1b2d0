//! Spreadsheet ingestion: reading, normalizing and importing survey rows

pub mod catalog;
pub mod excel;
pub mod normalize;
pub mod pipeline;
pub mod types;
