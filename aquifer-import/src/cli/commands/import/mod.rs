mod handler;

pub use handler::{handle_import_all_command, handle_import_command};

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Campaign name, or a unique suffix such as `2018`
    pub campaign: String,

    /// Workbook to read instead of looking one up in the data directory
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunOptions,
}

#[derive(Args, Debug)]
pub struct ImportAllArgs {
    #[command(flatten)]
    pub run: RunOptions,
}

/// Flags shared by the import commands
#[derive(Args, Debug)]
pub struct RunOptions {
    /// Directory holding the campaign workbooks, overrides AQUIFER_DATA_DIR
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Spatial match tolerance for this run, in coordinate units
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
