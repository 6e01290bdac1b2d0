//! Workbook access: reading survey sheets and decoding date serials

mod reader;
mod serial;

pub use reader::{read_first_sheet, resolve_source_file};
pub use serial::excel_serial_to_date;
