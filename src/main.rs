//! Bicycle Rental CLI
//!
//! Command-line interface for running a bicycle rental shop from CSV records.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --data-dir shop process commands.csv > outcomes.csv
//! cargo run -- --data-dir shop process --strategy sync --save commands.csv
//! cargo run -- --data-dir shop --today 2024-06-10 recommend --budget 500
//! cargo run -- --data-dir shop status
//! cargo run -- --data-dir shop search --type "Road Bike" --frame-size M
//! ```
//!
//! CSV results are written to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use bike_rental_engine::cli::{self, CliArgs, Command, ProcessArgs};
use bike_rental_engine::core::{recommend, Clock, FixedClock, RentalDesk, SystemClock};
use bike_rental_engine::io::{
    load_store, save_store, write_bicycles_csv, write_purchase_order_csv,
    write_status_counts_csv, DataFiles,
};
use bike_rental_engine::report::InventorySnapshot;
use bike_rental_engine::strategy;
use bike_rental_engine::types::{BicycleFilter, RentalError};
use std::io::Write;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), RentalError> {
    let clock: Box<dyn Clock> = match args.today {
        Some(today) => Box::new(FixedClock(today)),
        None => Box::new(SystemClock),
    };
    let files = DataFiles::in_dir(&args.data_dir);
    let mut output = std::io::stdout().lock();

    match args.command {
        Command::Process(process_args) => run_process(process_args, &files, clock, &mut output),
        Command::Recommend { budget } => {
            let snapshot = InventorySnapshot::capture(&load_store(&files)?, clock.today());
            write_purchase_order_csv(&recommend(&snapshot, budget), &mut output)
        }
        Command::Status => {
            let snapshot = InventorySnapshot::capture(&load_store(&files)?, clock.today());
            write_status_counts_csv(&snapshot.status_counts(), &mut output)
        }
        Command::Search(search_args) => {
            let snapshot = InventorySnapshot::capture(&load_store(&files)?, clock.today());
            let found: Vec<_> = snapshot
                .search(&BicycleFilter::from(search_args))
                .into_iter()
                .cloned()
                .collect();
            write_bicycles_csv(&found, &mut output)
        }
    }
}

fn run_process(
    args: ProcessArgs,
    files: &DataFiles,
    clock: Box<dyn Clock>,
    output: &mut dyn Write,
) -> Result<(), RentalError> {
    let config = if matches!(args.strategy, cli::StrategyType::Async) {
        Some(args.to_batch_config())
    } else {
        None
    };
    let strategy = strategy::create_strategy(args.strategy.clone(), config);

    let store = strategy.load(files)?;
    let mut desk = RentalDesk::new(store, clock, args.count_scope());

    strategy.process(&mut desk, &args.commands_file, output)?;

    if args.save {
        save_store(desk.store(), files)?;
    }
    Ok(())
}
