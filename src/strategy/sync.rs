//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It delegates:
//! - Record loading to `data_files::load_store`
//! - Command parsing to `SyncReader` (iterator interface)
//! - Business rules to `RentalDesk`
//! - CSV output to `csv_format::write_outcomes_csv`
//!
//! Commands are streamed one at a time; the commands file is never loaded whole.

use crate::core::engine::RentalDesk;
use crate::core::record_store::InMemoryRecordStore;
use crate::io::csv_format::{write_outcomes_csv, CommandRow};
use crate::io::data_files::{load_store, DataFiles};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use crate::types::RentalError;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use bike_rental_engine::core::RentalDesk;
/// use bike_rental_engine::io::DataFiles;
/// use bike_rental_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy;
/// let store = strategy.load(&DataFiles::in_dir(Path::new("data"))).unwrap();
/// let mut desk = RentalDesk::with_system_clock(store);
///
/// strategy
///     .process(&mut desk, Path::new("commands.csv"), &mut std::io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn load(&self, files: &DataFiles) -> Result<InMemoryRecordStore, RentalError> {
        load_store(files)
    }

    fn process(
        &self,
        desk: &mut RentalDesk,
        commands_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ProcessingSummary, RentalError> {
        let reader = SyncReader::<CommandRow>::open(commands_path)?;

        let mut summary = ProcessingSummary::default();
        let mut outcomes = Vec::new();

        for result in reader {
            match result {
                Ok(command) => {
                    let outcome = desk.apply(command);
                    summary.record(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => warn!(error = %e, "skipping command"),
            }
        }

        write_outcomes_csv(&outcomes, output)?;

        info!(
            applied = summary.applied,
            refused = summary.refused,
            "commands processed"
        );
        Ok(summary)
    }
}
