use crate::core::traits::RentalCountScope;
use crate::strategy::BatchConfig;
use crate::types::{parse_date, BicycleFilter};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Run a bicycle rental shop's desk and inventory reports
#[derive(Parser, Debug)]
#[command(name = "bike-rental")]
#[command(about = "Rent and return bicycles, report on inventory and plan purchases", long_about = None)]
pub struct CliArgs {
    /// Directory holding bicycles.csv, members.csv and rentals.csv
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = ".",
        global = true,
        help = "Directory containing the record CSV files"
    )]
    pub data_dir: PathBuf,

    /// Date to treat as today instead of the system date
    #[arg(
        long = "today",
        value_name = "DATE",
        global = true,
        value_parser = parse_cli_date,
        help = "Override today's date (YYYY-MM-DD or DD/MM/YYYY)"
    )]
    pub today: Option<NaiveDate>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        global = true,
        help = "Log level written to stderr: error, warn, info, debug or trace"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply rent and return commands, writing one outcome row per command
    Process(ProcessArgs),

    /// Recommend bicycles to buy within a budget
    Recommend {
        /// Amount available to spend
        #[arg(long = "budget", value_name = "AMOUNT")]
        budget: Decimal,
    },

    /// Count bicycles per status
    Status,

    /// List bicycles matching every given criterion
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Commands CSV file path
    #[arg(value_name = "COMMANDS", help = "Path to the commands CSV file")]
    pub commands_file: PathBuf,

    /// Processing strategy to use for reading files
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Count only open rentals against members' rental limits
    #[arg(long = "count-open-only")]
    pub count_open_only: bool,

    /// Write bicycles.csv and rentals.csv back after processing
    #[arg(long = "save")]
    pub save: bool,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    #[arg(long = "brand", value_name = "BRAND")]
    pub brand: Option<String>,

    #[arg(long = "type", value_name = "TYPE")]
    pub bicycle_type: Option<String>,

    #[arg(long = "frame-size", value_name = "SIZE")]
    pub frame_size: Option<String>,
}

/// Available processing strategies for CSV processing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

impl ProcessArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// A zero batch size falls back to the default with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        match self.batch_size {
            Some(size) => BatchConfig::new(size),
            None => BatchConfig::default(),
        }
    }

    pub fn count_scope(&self) -> RentalCountScope {
        if self.count_open_only {
            RentalCountScope::OpenOnly
        } else {
            RentalCountScope::AllHistory
        }
    }
}

impl From<SearchArgs> for BicycleFilter {
    fn from(args: SearchArgs) -> Self {
        BicycleFilter {
            brand: args.brand,
            bicycle_type: args.bicycle_type,
            frame_size: args.frame_size,
        }
    }
}
