use opus_vault_spec::{ArtefactId, ArtefactRecord, Result, StorageProvider, VaultError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Filesystem-backed provider storing one JSON file per record.
///
/// Records land under `<root>/<id>.json` and survive process restarts.
#[derive(Debug, Clone)]
pub struct FileProvider {
    root: PathBuf,
}

impl FileProvider {
    /// Construct a provider rooted at `root`. The directory is created on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ArtefactId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn write_record(&self, record: &ArtefactRecord) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|err| VaultError::Storage(err.to_string()))?;

        let path = self.path_for(&record.id);
        let data = serde_json::to_vec(record).map_err(|err| VaultError::Storage(err.to_string()))?;

        // Write to a sibling temp file and rename over the target, so a
        // replaced record stays intact when a write dies partway.
        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(|err| VaultError::Storage(err.to_string()))?;
        file.write_all(&data)
            .and_then(|_| file.sync_all())
            .map_err(|err| VaultError::Storage(err.to_string()))?;
        fs::rename(&tmp, &path).map_err(|err| VaultError::Storage(err.to_string()))
    }
}

impl StorageProvider for FileProvider {
    fn put(&self, record: ArtefactRecord) -> Result<()> {
        self.write_record(&record)
    }

    fn get(&self, id: &ArtefactId) -> Result<Option<ArtefactRecord>> {
        match fs::read(self.path_for(id)) {
            Ok(bytes) => {
                let record: ArtefactRecord = serde_json::from_slice(&bytes)
                    .map_err(|err| VaultError::Storage(err.to_string()))?;
                Ok(Some(record))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(VaultError::Storage(err.to_string())),
        }
    }

    fn delete(&self, id: &ArtefactId) -> Result<()> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(VaultError::NotFound {
                    entity: format!("artefact {id}"),
                })
            }
            Err(err) => Err(VaultError::Storage(err.to_string())),
        }
    }

    fn scan(&self) -> Result<Vec<ArtefactRecord>> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|err| VaultError::Storage(err.to_string()))? {
            let entry = entry.map_err(|err| VaultError::Storage(err.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).map_err(|err| VaultError::Storage(err.to_string()))?;
            let record: ArtefactRecord =
                serde_json::from_slice(&bytes).map_err(|err| VaultError::Storage(err.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}
