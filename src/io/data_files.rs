//! Data directory loading and saving
//!
//! A data directory holds the shop's records as three CSV files:
//!
//! ```text
//! bicycles.csv  id,brand,type,frame_size,rental_rate,purchase_date,condition,status
//! members.csv   id,name,email,phone,membership_end,rental_limit
//! rentals.csv   rental,bicycle,member,rental_date,expected_return_date,returned_on
//! ```
//!
//! `rentals.csv` is optional; a shop without one starts with no rental history.
//! Malformed rows are logged and skipped.

use crate::core::record_store::InMemoryRecordStore;
use crate::core::traits::RecordStore;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{
    write_bicycles_csv, write_rentals_csv, BicycleRow, CsvRow, MemberRow, RentalRow,
};
use crate::io::sync_reader::SyncReader;
use crate::types::RentalError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{info, warn};

pub const BICYCLES_FILE: &str = "bicycles.csv";
pub const MEMBERS_FILE: &str = "members.csv";
pub const RENTALS_FILE: &str = "rentals.csv";

/// Paths of the record files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub bicycles: PathBuf,
    pub members: PathBuf,
    pub rentals: PathBuf,
}

impl DataFiles {
    /// The standard file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        DataFiles {
            bicycles: dir.join(BICYCLES_FILE),
            members: dir.join(MEMBERS_FILE),
            rentals: dir.join(RENTALS_FILE),
        }
    }
}

/// Read every record of a file, skipping malformed rows
fn read_file<T: CsvRow>(path: &Path) -> Result<Vec<T::Record>, RentalError> {
    let mut records = Vec::new();

    for result in SyncReader::<T>::open(path)? {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping row"),
        }
    }

    Ok(records)
}

/// Load a record store, reading the files one after another
///
/// # Errors
///
/// Returns an error if `bicycles.csv` or `members.csv` is missing or
/// unreadable, or if `rentals.csv` exists but cannot be read.
pub fn load_store(files: &DataFiles) -> Result<InMemoryRecordStore, RentalError> {
    let bicycles = read_file::<BicycleRow>(&files.bicycles)?;
    let members = read_file::<MemberRow>(&files.members)?;
    let rentals = if files.rentals.exists() {
        read_file::<RentalRow>(&files.rentals)?
    } else {
        Vec::new()
    };

    info!(
        bicycles = bicycles.len(),
        members = members.len(),
        rentals = rentals.len(),
        "records loaded"
    );
    Ok(InMemoryRecordStore::seed(bicycles, members, rentals))
}

/// Read every record of a file asynchronously, skipping malformed rows
async fn read_file_async<T>(path: &Path, batch_size: usize) -> Result<Vec<T::Record>, RentalError>
where
    T: CsvRow + 'static,
{
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| RentalError::open_failed(path, e))?;

    let mut reader = AsyncReader::<_, T>::new(file.compat());
    Ok(reader.read_all(batch_size).await)
}

/// Load a record store, reading the three files concurrently
///
/// Same results and errors as [`load_store`].
pub async fn load_store_async(
    files: &DataFiles,
    batch_size: usize,
) -> Result<InMemoryRecordStore, RentalError> {
    let rentals = async {
        match tokio::fs::try_exists(&files.rentals).await {
            Ok(true) => read_file_async::<RentalRow>(&files.rentals, batch_size).await,
            Ok(false) => Ok(Vec::new()),
            Err(e) => Err(RentalError::from(e)),
        }
    };

    let (bicycles, members, rentals) = futures::try_join!(
        read_file_async::<BicycleRow>(&files.bicycles, batch_size),
        read_file_async::<MemberRow>(&files.members, batch_size),
        rentals,
    )?;

    info!(
        bicycles = bicycles.len(),
        members = members.len(),
        rentals = rentals.len(),
        "records loaded"
    );
    Ok(InMemoryRecordStore::seed(bicycles, members, rentals))
}

fn create(path: &Path) -> Result<BufWriter<File>, RentalError> {
    let file = File::create(path).map_err(|e| RentalError::IoError {
        message: format!("Failed to create file '{}': {}", path.display(), e),
    })?;
    Ok(BufWriter::new(file))
}

/// Write the store's bicycles and rentals back to their files
///
/// Members are never modified, so `members.csv` is left untouched.
pub fn save_store<S: RecordStore + ?Sized>(store: &S, files: &DataFiles) -> Result<(), RentalError> {
    let mut bicycles = create(&files.bicycles)?;
    write_bicycles_csv(&store.list_bicycles(), &mut bicycles)?;
    bicycles.flush()?;

    let mut rentals = create(&files.rentals)?;
    write_rentals_csv(&store.list_rentals(), &mut rentals)?;
    rentals.flush()?;

    info!(
        bicycles = %files.bicycles.display(),
        rentals = %files.rentals.display(),
        "records saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BicycleStatus, Condition};
    use std::fs;
    use tempfile::TempDir;

    const BICYCLES: &str = "id,brand,type,frame_size,rental_rate,purchase_date,condition,status\n\
        1,Trek,Road Bike,M,£10/day,2023-01-15,Good,Available\n\
        2,Giant,Mountain Bike,L,15,15/03/2022,Poor,Rented\n\
        3,Raleigh,City Bike,S,£8/day,not a date,Good,Available\n\
        4,Broken,Road Bike,M,£9/day,2023-01-15,Good,Stolen\n\
        1,Duplicate,Road Bike,M,£1/day,2023-01-15,Good,Available\n";

    const MEMBERS: &str = "id,name,email,phone,membership_end,rental_limit\n\
        1,Ada,ada@example.com,0123,2030-12-31,2\n\
        2,Bob,bob@example.com,0456,,1\n";

    const RENTALS: &str = "rental,bicycle,member,rental_date,expected_return_date,returned_on\n\
        1,2,1,2024-06-01,2024-06-04,\n";

    fn data_dir(rentals: Option<&str>) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join(BICYCLES_FILE), BICYCLES).unwrap();
        fs::write(dir.path().join(MEMBERS_FILE), MEMBERS).unwrap();
        if let Some(rentals) = rentals {
            fs::write(dir.path().join(RENTALS_FILE), rentals).unwrap();
        }
        dir
    }

    fn assert_loaded(store: &InMemoryRecordStore, rentals: usize) {
        let bicycles = store.list_bicycles();
        assert_eq!(bicycles.len(), 3);
        assert_eq!(bicycles[0].brand, "Trek");
        assert_eq!(bicycles[1].condition, Condition::Poor);
        assert_eq!(bicycles[1].status, BicycleStatus::Rented);
        assert!(bicycles[2].purchase_date.is_none());

        assert_eq!(store.list_members().len(), 2);
        assert_eq!(store.list_rentals().len(), rentals);
    }

    #[test]
    fn test_load_store() {
        let dir = data_dir(Some(RENTALS));
        let store = load_store(&DataFiles::in_dir(dir.path())).unwrap();
        assert_loaded(&store, 1);
    }

    #[test]
    fn test_load_store_without_rentals_file() {
        let dir = data_dir(None);
        let store = load_store(&DataFiles::in_dir(dir.path())).unwrap();
        assert_loaded(&store, 0);
    }

    #[test]
    fn test_load_store_requires_bicycles() {
        let dir = data_dir(None);
        fs::remove_file(dir.path().join(BICYCLES_FILE)).unwrap();

        let result = load_store(&DataFiles::in_dir(dir.path()));
        assert!(matches!(result, Err(RentalError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_store_async_matches_sync() {
        let dir = data_dir(Some(RENTALS));
        let files = DataFiles::in_dir(dir.path());

        let store = load_store_async(&files, 2).await.unwrap();
        assert_loaded(&store, 1);

        let sync = load_store(&files).unwrap();
        assert_eq!(store.list_bicycles(), sync.list_bicycles());
        assert_eq!(store.list_rentals(), sync.list_rentals());
    }

    #[tokio::test]
    async fn test_load_store_async_requires_members() {
        let dir = data_dir(None);
        fs::remove_file(dir.path().join(MEMBERS_FILE)).unwrap();

        let result = load_store_async(&DataFiles::in_dir(dir.path()), 10).await;
        assert!(matches!(result, Err(RentalError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_keeps_rentals_with_malformed_dates() {
        let dir = data_dir(Some(
            "rental,bicycle,member,rental_date,expected_return_date,returned_on\n\
             1,2,1,2024-01-01,2024-01-03,2024-01-03\n\
             2,2,1,2024-06-01,2024/25/12,\n",
        ));
        let files = DataFiles::in_dir(dir.path());
        let store = load_store(&files).unwrap();

        let open = store.get_open_rental(2).unwrap();
        assert_eq!(open.id, 2);
        assert!(open.expected_return_date.is_malformed());
        assert_eq!(
            store.count_rentals_for_member(1, crate::core::traits::RentalCountScope::AllHistory),
            2
        );

        save_store(&store, &files).unwrap();
        let saved = fs::read_to_string(&files.rentals).unwrap();
        assert!(saved.contains("2,2,1,2024-06-01,2024/25/12,"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = data_dir(Some(RENTALS));
        let files = DataFiles::in_dir(dir.path());
        let store = load_store(&files).unwrap();

        save_store(&store, &files).unwrap();

        let saved = fs::read_to_string(&files.bicycles).unwrap();
        assert!(saved.contains("2,Giant,Mountain Bike,L,£15/day,2022-03-15,Poor,Rented"));
        assert!(saved.contains("3,Raleigh,City Bike,S,£8/day,,Good,Available"));

        let reloaded = load_store(&files).unwrap();
        assert_eq!(reloaded.list_bicycles(), store.list_bicycles());
        assert_eq!(reloaded.list_rentals(), store.list_rentals());
    }
}
