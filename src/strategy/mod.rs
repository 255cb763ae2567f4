//! Processing strategy module for command processing
//!
//! This module defines the Strategy pattern for complete processing pipelines:
//! loading the record files, reading a commands CSV, applying each command at
//! the rental desk and writing one outcome row per command. Different
//! implementations (synchronous, asynchronous batch) can be selected at
//! runtime and produce identical output.

use crate::cli::StrategyType;
use crate::core::engine::{CommandOutcome, RentalDesk};
use crate::core::record_store::InMemoryRecordStore;
use crate::io::data_files::DataFiles;
use crate::types::RentalError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counts of applied and refused commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub applied: usize,
    pub refused: usize,
}

impl ProcessingSummary {
    /// Tally an outcome
    pub fn record(&mut self, outcome: &CommandOutcome) {
        if outcome.result.is_ok() {
            self.applied += 1;
        } else {
            self.refused += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.applied + self.refused
    }
}

/// Processing strategy trait for complete command processing pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Load the record store from the data directory's files
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or unreadable.
    /// Malformed rows are logged and skipped.
    fn load(&self, files: &DataFiles) -> Result<InMemoryRecordStore, RentalError>;

    /// Apply every command in `commands_path` and write the outcomes to output
    ///
    /// Commands are applied one at a time in file order. A refused command is
    /// reported in its outcome row and processing continues with the next.
    ///
    /// # Arguments
    ///
    /// * `desk` - Rental desk the commands are applied to
    /// * `commands_path` - Path to the commands CSV file
    /// * `output` - Mutable reference to a writer for outputting outcome rows
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The commands file cannot be opened (file not found, permission denied)
    /// - Output cannot be written
    ///
    /// Malformed command rows are logged and skipped.
    fn process(
        &self,
        desk: &mut RentalDesk,
        commands_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ProcessingSummary, RentalError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch reading (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
