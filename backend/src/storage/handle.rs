//! Single-writer access to the dataset.

use std::sync::Mutex;

use shared::Dataset;

use crate::domain::errors::DomainError;
use crate::storage::traits::DatasetStorage;

/// Explicit handle to the persisted dataset.
///
/// Mutations go through [`DatasetHandle::transact`], which serializes the
/// whole read-modify-write cycle behind one lock. The backing store has no
/// optimistic concurrency control, so without this two concurrent handlers
/// could silently drop each other's writes.
pub struct DatasetHandle<S: DatasetStorage> {
    storage: S,
    write_lock: Mutex<()>,
}

impl<S: DatasetStorage> DatasetHandle<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Load a fresh copy of the dataset for a read-only operation.
    pub fn read(&self) -> Result<Dataset, DomainError> {
        Ok(self.storage.load()?)
    }

    /// Run a mutation as one atomic read-modify-write cycle.
    ///
    /// The dataset is loaded, handed to `mutate`, and persisted only if the
    /// closure succeeds. On any error nothing is written, so a failed
    /// validation leaves no observable state change.
    pub fn transact<T>(
        &self,
        mutate: impl FnOnce(&mut Dataset) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut dataset = self.storage.load()?;
        let output = mutate(&mut dataset)?;
        self.storage.store(&dataset)?;
        Ok(output)
    }
}
