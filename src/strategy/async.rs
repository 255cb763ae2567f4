//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous implementation of the
//! ProcessingStrategy trait. Record files are read concurrently and commands
//! are read in batches with csv-async on a tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size)
//!     ├── load_store_async (three record files read concurrently)
//!     ├── AsyncReader (batch CSV reading of commands)
//!     └── RentalDesk (commands applied one at a time, in file order)
//! ```
//!
//! Only I/O is asynchronous. Each batch is applied to the desk in file order
//! before the next one is read, so output matches the sync strategy exactly.

use crate::core::engine::RentalDesk;
use crate::core::record_store::InMemoryRecordStore;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{write_outcomes_csv, CommandRow};
use crate::io::data_files::{load_store_async, DataFiles};
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use crate::types::RentalError;
use std::io::Write;
use std::path::Path;
use tokio::runtime::Runtime;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, info, warn};

/// Configuration for batch reading
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of rows per batch
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, falling back to the default for a zero size
    pub fn new(batch_size: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        Self { batch_size }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn runtime() -> Result<Runtime, RentalError> {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| RentalError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn load(&self, files: &DataFiles) -> Result<InMemoryRecordStore, RentalError> {
        Self::runtime()?.block_on(load_store_async(files, self.config.batch_size))
    }

    /// Apply commands read in batches
    ///
    /// 1. Opens the commands file with tokio and wraps it for csv-async
    /// 2. Reads up to `batch_size` commands at a time with AsyncReader
    /// 3. Applies each batch to the desk in file order before reading the next
    /// 4. Writes the outcomes using the csv_format module
    fn process(
        &self,
        desk: &mut RentalDesk,
        commands_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ProcessingSummary, RentalError> {
        let runtime = Self::runtime()?;

        let outcomes = runtime.block_on(async {
            let file = tokio::fs::File::open(commands_path)
                .await
                .map_err(|e| RentalError::open_failed(commands_path, e))?;

            let mut reader = AsyncReader::<_, CommandRow>::new(file.compat());
            let mut outcomes = Vec::new();
            let batch_size = self.config.batch_size.max(1);

            loop {
                let batch = reader.read_batch(batch_size).await;
                if batch.is_empty() {
                    break;
                }

                debug!(commands = batch.len(), "applying batch");
                outcomes.extend(batch.into_iter().map(|command| desk.apply(command)));
            }

            Ok::<_, RentalError>(outcomes)
        })?;

        let mut summary = ProcessingSummary::default();
        for outcome in &outcomes {
            summary.record(outcome);
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
