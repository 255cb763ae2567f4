//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, output serialization)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `data_files` - Loading and saving the record files of a data directory

pub mod async_reader;
pub mod csv_format;
pub mod data_files;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    write_bicycles_csv, write_outcomes_csv, write_purchase_order_csv, write_rentals_csv,
    write_status_counts_csv, BicycleRow, CommandRow, CsvRow, MemberRow, RentalRow,
};
pub use data_files::{load_store, load_store_async, save_store, DataFiles};
pub use sync_reader::SyncReader;
