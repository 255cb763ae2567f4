//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading over the records of a CSV file, for any row type
//! implementing [`CsvRow`].
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - any `futures::io::AsyncRead` source (tokio files via `tokio-util` compat)
//!
//! ```text
//! CSV source → AsyncReader → Batches of records
//!                  ↓
//!           csv_format module
//!           (CsvRow::convert)
//! ```

use crate::io::csv_format::CsvRow;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;
use tracing::warn;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin, T: CsvRow> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    row: PhantomData<T>,
}

impl<R, T> AsyncReader<R, T>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: CsvRow + 'static,
{
    /// Create a new AsyncReader from an async source
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            row: PhantomData,
        }
    }

    /// Read a batch of records
    ///
    /// Reads up to `batch_size` rows, converting each one. Malformed rows are
    /// logged with their line number and skipped, so a batch may be shorter
    /// than the number of rows consumed.
    ///
    /// # Returns
    ///
    /// Converted records in file order; empty once the file is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T::Record> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<T>();

        while batch.len() < batch_size {
            let Some(next) = rows.next().await else {
                break;
            };
            self.line_num += 1;

            match next {
                Ok(row) => match row.convert() {
                    Ok(record) => batch.push(record),
                    Err(e) => warn!(line = self.line_num, error = %e, "skipping row"),
                },
                Err(e) => warn!(line = self.line_num, error = %e, "skipping unparseable row"),
            }
        }

        batch
    }

    /// Read every remaining record
    pub async fn read_all(&mut self, batch_size: usize) -> Vec<T::Record> {
        let mut records = Vec::new();
        loop {
            let batch = self.read_batch(batch_size.max(1)).await;
            if batch.is_empty() {
                break;
            }
            records.extend(batch);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::{CommandRow, MemberRow};
    use crate::types::DeskCommand;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const COMMANDS: &str = "action,bicycle,member,days,damage\n\
        rent,1,1,3,\n\
        rent,2,1,2,\n\
        return,1,,,\n\
        return,2,,,5\n\
        rent,3,2,1,\n";

    fn commands(content: &'static str) -> AsyncReader<Cursor<&'static [u8]>, CommandRow> {
        AsyncReader::new(Cursor::new(content.as_bytes()))
    }

    #[tokio::test]
    async fn test_read_batch_in_order() {
        let mut reader = commands(COMMANDS);

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].bicycle(), 1);
        assert_eq!(batch[1].bicycle(), 2);

        let batch = reader.read_batch(2).await;
        assert_eq!(
            batch[1],
            DeskCommand::Return {
                bicycle: 2,
                damage_charge: Decimal::new(5, 0)
            }
        );

        assert_eq!(reader.read_batch(2).await.len(), 1);
        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_rows_are_skipped() {
        let mut reader = commands(
            "action,bicycle,member,days,damage\n\
             fix,1,1,3,\n\
             rent,one,1,3,\n\
             return,4,,,\n",
        );

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].bicycle(), 4);
    }

    #[tokio::test]
    async fn test_read_all() {
        let mut reader = commands(COMMANDS);
        assert_eq!(reader.read_all(2).await.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_csv() {
        let mut reader = commands("action,bicycle,member,days,damage\n");
        assert!(reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_reads_members() {
        let csv = "id,name,email,phone,membership_end,rental_limit\n\
                   1,Ada,ada@example.com,0123,31/12/2030,2\n\
                   2,Bob,bob@example.com,0456,,1\n";
        let mut reader: AsyncReader<_, MemberRow> = AsyncReader::new(Cursor::new(csv.as_bytes()));

        let members = reader.read_all(10).await;
        assert_eq!(members.len(), 2);
        assert!(members[0].membership_end.is_some());
        assert!(members[1].membership_end.is_none());
    }
}
