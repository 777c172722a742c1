//! # healthkit-extract
//!
//! A command-line tool for extracting Apple Health exports to CSV files.
//!
//! ## Usage
//!
//! ```bash
//! # Extract all data types into the current directory
//! healthkit-extract export.xml
//!
//! # Extract only health records and workouts into data/
//! healthkit-extract export.xml --output data/ --types records workouts
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
