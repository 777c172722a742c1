use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use healthkit_extract::pipeline::ExtractionStrategy;
use healthkit_extract::schema::Category;

mod config;
mod extract;
mod progress;

/// healthkit-extract - Extract Apple Health export data to CSV files
#[derive(Parser, Debug)]
#[command(name = "healthkit-extract")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
    # Extract all data types
    healthkit-extract export.xml --output data/

    # Extract only health records
    healthkit-extract export.xml --output data/ --types records

    # Extract records and workouts
    healthkit-extract export.xml --output data/ --types records workouts")]
pub struct Cli {
    /// Path to the Apple Health export XML file
    #[arg(value_name = "XML_FILE")]
    input: PathBuf,

    /// Output directory for CSV files (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Types of data to extract (default: all)
    #[arg(short = 't', long = "types", value_enum, num_args = 1.., action = ArgAction::Append)]
    types: Vec<CategoryArg>,

    /// Read the input once for all types, or once per type
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Category names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Health records (Record elements)
    #[value(alias = "measurements")]
    Records,
    /// Workouts (Workout elements)
    Workouts,
    /// Daily activity summaries (ActivitySummary elements)
    #[value(alias = "activity-summaries")]
    Activity,
}

/// Traversal strategy override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// One pass over the input for all selected types
    SinglePass,
    /// One full pass over the input per selected type
    PerCategory,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Records => Category::Measurements,
            CategoryArg::Workouts => Category::Workouts,
            CategoryArg::Activity => Category::ActivitySummaries,
        }
    }
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::SinglePass => ExtractionStrategy::SinglePass,
            StrategyArg::PerCategory => ExtractionStrategy::PerCategory,
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    extract::run(
        cli.input,
        cli.output,
        cli.types.into_iter().map(Category::from).collect(),
        cli.strategy.map(ExtractionStrategy::from),
        cli.config,
    )
}
