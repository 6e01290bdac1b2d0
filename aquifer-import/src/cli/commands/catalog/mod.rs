mod handler;

pub use handler::handle_catalog_command;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Load parameters and aliases from a CSV file
    /// (param_code,param_name,standard_unit,alias,campaign)
    Import {
        /// CSV file to load
        file: PathBuf,
    },
    /// Show how headers resolve to parameters for a campaign
    List {
        /// Campaign name, or a unique suffix such as `2018`
        campaign: String,
    },
}
