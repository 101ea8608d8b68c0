use opus_vault_spec::{ArtefactId, ArtefactRecord, Result, StorageProvider, VaultError};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory provider for tests and embedded use. Nothing survives drop.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    state: Mutex<HashMap<ArtefactId, ArtefactRecord>>,
}

impl MemoryProvider {
    /// Construct an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageProvider for MemoryProvider {
    fn put(&self, record: ArtefactRecord) -> Result<()> {
        self.state.lock().unwrap().insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: &ArtefactId) -> Result<Option<ArtefactRecord>> {
        Ok(self.state.lock().unwrap().get(id).cloned())
    }

    fn delete(&self, id: &ArtefactId) -> Result<()> {
        match self.state.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(VaultError::NotFound {
                entity: format!("artefact {id}"),
            }),
        }
    }

    fn scan(&self) -> Result<Vec<ArtefactRecord>> {
        Ok(self.state.lock().unwrap().values().cloned().collect())
    }
}
