//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the records of a CSV file, for any row
//! type implementing [`CsvRow`]. Delegates format concerns to the csv_format
//! module.
//!
//! ```no_run
//! use bike_rental_engine::io::csv_format::CommandRow;
//! use bike_rental_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::<CommandRow>::open(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Applying {:?}", command),
//!         Err(e) => eprintln!("Skipping row: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `open()`
//! - Individual row errors are yielded as `Err` items carrying the line number
//!
//! Rows are read one at a time; the file is never loaded whole.

use crate::io::csv_format::CsvRow;
use crate::types::RentalError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader yielding converted records
#[derive(Debug)]
pub struct SyncReader<T: CsvRow, R: Read = File> {
    reader: csv::Reader<R>,
    line_num: u64,
    row: PhantomData<T>,
}

impl<T: CsvRow> SyncReader<T, File> {
    /// Open a CSV file for streaming iteration
    ///
    /// # Errors
    ///
    /// * `FileNotFound` if nothing exists at `path`
    /// * `IoError` if the file could not be opened
    pub fn open(path: &Path) -> Result<Self, RentalError> {
        let file = File::open(path).map_err(|e| RentalError::open_failed(path, e))?;

        Ok(Self::new(file))
    }
}

impl<T: CsvRow, R: Read> SyncReader<T, R> {
    /// Wrap any reader of CSV text
    ///
    /// The CSV reader is configured to trim whitespace from all fields and to
    /// allow flexible field counts, so trailing optional columns may be left
    /// off.
    pub fn new(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        Self {
            reader,
            line_num: 1,
            row: PhantomData,
        }
    }
}

impl<T: CsvRow, R: Read> Iterator for SyncReader<T, R> {
    type Item = Result<T::Record, RentalError>;

    /// Read and convert the next row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(record))` - Successfully converted row
    /// * `Some(Err(ParseError))` - Malformed row, with its line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.reader.deserialize::<T>().next()?;
        self.line_num += 1;

        let line = self.line_num;
        Some(
            next.map_err(|e| RentalError::ParseError {
                line: Some(line),
                message: e.to_string(),
            })
            .and_then(|row| {
                row.convert().map_err(|e| RentalError::ParseError {
                    line: Some(line),
                    message: e.to_string(),
                })
            }),
        )
    }
}
