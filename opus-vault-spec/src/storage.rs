use crate::error::Result;
use crate::record::{ArtefactId, ArtefactRecord};
use std::sync::Arc;

/// Persistence contract for artefact records.
///
/// Providers store records opaquely: ciphertext and checksum arrive already
/// sealed, and no provider implementation touches plaintext or keys. A
/// provider must keep each call atomic, so a record is never observable in a
/// half-written state.
pub trait StorageProvider: Send + Sync {
    /// Insert or replace the record stored under `record.id`.
    fn put(&self, record: ArtefactRecord) -> Result<()>;

    /// Fetch the record stored under `id`, or `Ok(None)` when absent.
    ///
    /// `Err` is reserved for provider failures; a missing record is not a
    /// failure at this layer.
    fn get(&self, id: &ArtefactId) -> Result<Option<ArtefactRecord>>;

    /// Remove the record stored under `id`.
    ///
    /// Returns `VaultError::NotFound` when nothing is stored under `id`.
    fn delete(&self, id: &ArtefactId) -> Result<()>;

    /// Return every stored record, in no particular order.
    fn scan(&self) -> Result<Vec<ArtefactRecord>>;
}

impl<T: StorageProvider + ?Sized> StorageProvider for Arc<T> {
    fn put(&self, record: ArtefactRecord) -> Result<()> {
        (**self).put(record)
    }

    fn get(&self, id: &ArtefactId) -> Result<Option<ArtefactRecord>> {
        (**self).get(id)
    }

    fn delete(&self, id: &ArtefactId) -> Result<()> {
        (**self).delete(id)
    }

    fn scan(&self) -> Result<Vec<ArtefactRecord>> {
        (**self).scan()
    }
}

impl<T: StorageProvider + ?Sized> StorageProvider for Box<T> {
    fn put(&self, record: ArtefactRecord) -> Result<()> {
        (**self).put(record)
    }

    fn get(&self, id: &ArtefactId) -> Result<Option<ArtefactRecord>> {
        (**self).get(id)
    }

    fn delete(&self, id: &ArtefactId) -> Result<()> {
        (**self).delete(id)
    }

    fn scan(&self) -> Result<Vec<ArtefactRecord>> {
        (**self).scan()
    }
}

/// Shared handle to a type-erased provider.
pub type DynStorageProvider = Arc<dyn StorageProvider + Send + Sync>;
