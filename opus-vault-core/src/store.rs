use crate::checksum::ChecksumService;
use crate::crypto::ArtefactCipher;
use crate::policy::AccessPolicy;
use crate::stamp::TimestampObserver;
use opus_vault_spec::{
    ArtefactId, ArtefactKind, ArtefactRecord, ArtefactSummary, Identity, Result, StorageProvider,
    UserId, VaultError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// High-level API that pairs a storage provider with encryption, integrity
/// checking, access control, and audit stamping.
///
/// Every operation authenticates against the policy before touching record
/// content. Mutations of the same record are serialized through a per-id
/// lock table; operations on distinct records proceed independently.
pub struct ArtefactStore<S>
where
    S: StorageProvider,
{
    provider: S,
    cipher: ArtefactCipher,
    policy: AccessPolicy,
    observer: TimestampObserver,
    mutation_locks: Mutex<HashMap<ArtefactId, Arc<Mutex<()>>>>,
}

impl<S> ArtefactStore<S>
where
    S: StorageProvider,
{
    /// Construct a store from the provided persistence and crypto pieces.
    pub fn new(provider: S, cipher: ArtefactCipher) -> Self {
        Self {
            provider,
            cipher,
            policy: AccessPolicy,
            observer: TimestampObserver,
            mutation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Borrow the underlying provider reference.
    pub fn provider(&self) -> &S {
        &self.provider
    }

    /// Encrypt and persist new content owned by the caller.
    pub fn create(
        &self,
        identity: &Identity,
        name: impl Into<String>,
        kind: ArtefactKind,
        plaintext: &[u8],
    ) -> Result<ArtefactRecord> {
        if plaintext.is_empty() {
            return Err(VaultError::EmptyContent);
        }

        let checksum = ChecksumService::compute(plaintext);
        let (ciphertext, envelope) = self.cipher.encrypt(plaintext)?;
        let mut record = ArtefactRecord::new(
            ArtefactId::generate(),
            identity.user_id().clone(),
            name,
            kind,
            ciphertext,
            envelope,
            checksum,
        )?;
        self.observer.on_create(&mut record);
        self.provider.put(record.clone())?;

        debug!(artefact = %record.id, owner = %record.owner_id, kind = %record.kind, "artefact created");
        Ok(record)
    }

    /// Retrieve and decrypt an artefact's content.
    ///
    /// The plaintext is released only after both integrity signals pass:
    /// the AEAD tag during decryption and the stored checksum afterwards.
    pub fn read(&self, identity: &Identity, id: &ArtefactId) -> Result<Vec<u8>> {
        let record = self.fetch(identity, id, "read artefact")?;
        self.ensure(self.policy.can_read(identity, &record), "read artefact")?;

        let plaintext = self.cipher.decrypt(&record.envelope, &record.ciphertext)?;
        if !ChecksumService::verify(&plaintext, &record.checksum) {
            warn!(artefact = %record.id, "stored checksum does not match decrypted content");
            return Err(VaultError::ChecksumMismatch {
                entity: record.id.to_string(),
            });
        }
        Ok(plaintext)
    }

    /// Retrieve an artefact's metadata without decrypting its content.
    pub fn metadata(&self, identity: &Identity, id: &ArtefactId) -> Result<ArtefactSummary> {
        let record = self.fetch(identity, id, "read artefact")?;
        self.ensure(self.policy.can_read(identity, &record), "read artefact")?;
        Ok(ArtefactSummary::from_record(&record))
    }

    /// Replace an artefact's content, re-encrypting under a fresh nonce.
    pub fn update(
        &self,
        identity: &Identity,
        id: &ArtefactId,
        plaintext: &[u8],
    ) -> Result<ArtefactRecord> {
        if plaintext.is_empty() {
            return Err(VaultError::EmptyContent);
        }

        let lock = self.mutation_lock(id);
        let _guard = lock.lock().unwrap();

        let mut record = self.fetch(identity, id, "update artefact")?;
        self.ensure(self.policy.can_write(identity, &record), "update artefact")?;

        record.checksum = ChecksumService::compute(plaintext);
        let (ciphertext, envelope) = self.cipher.encrypt(plaintext)?;
        record.ciphertext = ciphertext;
        record.envelope = envelope;
        self.observer.on_update(&mut record);
        self.provider.put(record.clone())?;

        debug!(artefact = %record.id, owner = %record.owner_id, "artefact updated");
        Ok(record)
    }

    /// Change an artefact's name. Content and checksum are untouched, but
    /// the update stamp still advances.
    pub fn rename(
        &self,
        identity: &Identity,
        id: &ArtefactId,
        name: impl Into<String>,
    ) -> Result<ArtefactRecord> {
        let lock = self.mutation_lock(id);
        let _guard = lock.lock().unwrap();

        let mut record = self.fetch(identity, id, "rename artefact")?;
        self.ensure(self.policy.can_write(identity, &record), "rename artefact")?;

        record.set_name(name)?;
        self.observer.on_update(&mut record);
        self.provider.put(record.clone())?;

        debug!(artefact = %record.id, owner = %record.owner_id, "artefact renamed");
        Ok(record)
    }

    /// Remove an artefact permanently.
    pub fn delete(&self, identity: &Identity, id: &ArtefactId) -> Result<()> {
        let lock = self.mutation_lock(id);
        let _guard = lock.lock().unwrap();

        let record = self.fetch(identity, id, "delete artefact")?;
        self.ensure(self.policy.can_delete(identity, &record), "delete artefact")?;

        self.provider.delete(id)?;
        debug!(artefact = %id, owner = %record.owner_id, "artefact deleted");
        Ok(())
    }

    /// List artefact metadata visible to the caller, ordered by creation
    /// time (record id breaks ties, so the order is stable).
    ///
    /// Admins see every record; other callers see only their own.
    pub fn list(&self, identity: &Identity) -> Result<Vec<ArtefactSummary>> {
        let mut records = self.provider.scan()?;
        if !self.policy.can_list_all(identity) {
            records.retain(|record| &record.owner_id == identity.user_id());
        }
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records.iter().map(ArtefactSummary::from_record).collect())
    }

    /// Remove every artefact owned by `target`, all or none.
    ///
    /// Only admins may cascade. If the provider fails partway through, the
    /// records already removed are written back before the error returns,
    /// so the target's holdings never end up half-deleted. A target owning
    /// nothing is already in the goal state and succeeds trivially.
    pub fn delete_user(&self, identity: &Identity, target: &UserId) -> Result<()> {
        self.ensure(self.policy.can_list_all(identity), "delete user")?;

        let mut owned: Vec<ArtefactRecord> = self
            .provider
            .scan()?
            .into_iter()
            .filter(|record| &record.owner_id == target)
            .collect();
        owned.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut removed: Vec<ArtefactRecord> = Vec::with_capacity(owned.len());
        for record in owned {
            let lock = self.mutation_lock(&record.id);
            let _guard = lock.lock().unwrap();

            match self.provider.delete(&record.id) {
                Ok(()) => removed.push(record),
                // Already gone; the goal state holds for this record.
                Err(VaultError::NotFound { .. }) => {}
                Err(err) => {
                    warn!(
                        owner = %target,
                        removed = removed.len(),
                        error = %err,
                        "cascade delete failed partway; restoring removed artefacts"
                    );
                    self.restore(&removed);
                    return Err(err);
                }
            }
        }

        debug!(owner = %target, removed = removed.len(), "user artefacts deleted");
        Ok(())
    }

    /// Fetch a record and filter its absence through the policy: admins
    /// learn that an id does not exist, everyone else is denied without
    /// confirmation either way.
    fn fetch(
        &self,
        identity: &Identity,
        id: &ArtefactId,
        action: &'static str,
    ) -> Result<ArtefactRecord> {
        match self.provider.get(id)? {
            Some(record) => Ok(record),
            None if identity.is_admin() => Err(VaultError::NotFound {
                entity: format!("artefact {id}"),
            }),
            None => Err(VaultError::AccessDenied { action }),
        }
    }

    fn ensure(&self, allowed: bool, action: &'static str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(VaultError::AccessDenied { action })
        }
    }

    fn mutation_lock(&self, id: &ArtefactId) -> Arc<Mutex<()>> {
        let mut locks = self.mutation_locks.lock().unwrap();
        locks.entry(*id).or_default().clone()
    }

    fn restore(&self, records: &[ArtefactRecord]) {
        for record in records {
            if let Err(err) = self.provider.put(record.clone()) {
                warn!(artefact = %record.id, error = %err, "failed to restore artefact");
            }
        }
    }
}
