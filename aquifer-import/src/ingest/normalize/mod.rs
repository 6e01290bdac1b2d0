//! Value normalization: raw cells and headers into typed observations
//!
//! Nothing in here fails. Unparseable input degrades to `None` and the
//! caller decides what a missing value means.

mod cell;
mod date;
mod header;
mod number;

pub use cell::{CellReading, normalize_cell};
pub use date::{DateFormat, DateFormatError, first_of_year, normalize_date, year_of};
pub use header::{HeaderParts, parse_header};
pub use number::normalize_number;
