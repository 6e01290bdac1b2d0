pub mod campaigns;
pub mod catalog;
pub mod import;
