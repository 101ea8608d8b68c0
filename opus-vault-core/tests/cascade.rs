use opus_vault_core::{
    ArtefactCipher, ArtefactId, ArtefactKind, ArtefactRecord, ArtefactStore, EncryptionAlgorithm,
    Identity, MasterKey, MemoryProvider, Result, Role, StorageProvider, UserId, VaultError,
};
use std::sync::Mutex;

/// Provider double that fails one chosen delete call and counts the rest.
struct FlakyProvider {
    inner: MemoryProvider,
    fail_on_delete: usize,
    deletes: Mutex<usize>,
}

impl FlakyProvider {
    fn new(fail_on_delete: usize) -> Self {
        Self {
            inner: MemoryProvider::new(),
            fail_on_delete,
            deletes: Mutex::new(0),
        }
    }

    fn delete_calls(&self) -> usize {
        *self.deletes.lock().unwrap()
    }
}

impl StorageProvider for FlakyProvider {
    fn put(&self, record: ArtefactRecord) -> Result<()> {
        self.inner.put(record)
    }

    fn get(&self, id: &ArtefactId) -> Result<Option<ArtefactRecord>> {
        self.inner.get(id)
    }

    fn delete(&self, id: &ArtefactId) -> Result<()> {
        let mut deletes = self.deletes.lock().unwrap();
        *deletes += 1;
        if *deletes == self.fail_on_delete {
            return Err(VaultError::Storage("synthetic delete failure".into()));
        }
        self.inner.delete(id)
    }

    fn scan(&self) -> Result<Vec<ArtefactRecord>> {
        self.inner.scan()
    }
}

fn store_with(fail_on_delete: usize) -> ArtefactStore<FlakyProvider> {
    ArtefactStore::new(
        FlakyProvider::new(fail_on_delete),
        ArtefactCipher::new(MasterKey::random(), EncryptionAlgorithm::Aes256Gcm),
    )
}

fn user(name: &str) -> Identity {
    Identity::new(UserId::new(name).unwrap(), Role::User)
}

fn admin() -> Identity {
    Identity::new(UserId::new("root").unwrap(), Role::Admin)
}

fn seed(store: &ArtefactStore<FlakyProvider>) -> (Identity, Identity) {
    let target = user("leaving");
    let bystander = user("staying");

    for name in ["One", "Two", "Three"] {
        store
            .create(&target, name, ArtefactKind::Lyrics, b"owned by target")
            .unwrap();
    }
    store
        .create(&bystander, "Kept", ArtefactKind::Audio, b"someone else's")
        .unwrap();

    (target, bystander)
}

#[test]
fn cascade_removes_every_owned_record() {
    let store = store_with(0);
    let (target, bystander) = seed(&store);

    store.delete_user(&admin(), target.user_id()).unwrap();

    assert_eq!(store.provider().inner.len(), 1);
    assert_eq!(store.list(&target).unwrap().len(), 0);
    assert_eq!(store.list(&bystander).unwrap().len(), 1);
    assert_eq!(store.provider().delete_calls(), 3);
}

#[test]
fn cascade_on_empty_target_is_a_noop() {
    let store = store_with(0);
    let (_, bystander) = seed(&store);

    store
        .delete_user(&admin(), &UserId::new("nobody").unwrap())
        .unwrap();

    assert_eq!(store.provider().inner.len(), 4);
    assert_eq!(store.list(&bystander).unwrap().len(), 1);
    assert_eq!(store.provider().delete_calls(), 0);
}

#[test]
fn mid_cascade_failure_restores_removed_records() {
    let store = store_with(2);
    let (target, bystander) = seed(&store);
    let before = store.list(&admin()).unwrap();

    let err = store.delete_user(&admin(), target.user_id()).unwrap_err();
    assert!(matches!(err, VaultError::Storage(_)));

    // All or none: the record removed before the failure came back, so the
    // target still owns all three and the bystander is untouched.
    assert_eq!(store.provider().inner.len(), 4);
    assert_eq!(store.list(&target).unwrap().len(), 3);
    assert_eq!(store.list(&bystander).unwrap().len(), 1);

    // Restored records are byte-identical, stamps included.
    assert_eq!(store.list(&admin()).unwrap(), before);

    // Content still decrypts after restoration.
    for item in store.list(&target).unwrap() {
        assert_eq!(store.read(&target, &item.id).unwrap(), b"owned by target");
    }
}

#[test]
fn failed_cascade_can_be_retried() {
    let store = store_with(2);
    let (target, _) = seed(&store);

    assert!(store.delete_user(&admin(), target.user_id()).is_err());

    // The fault was transient; the second attempt completes the cascade.
    store.delete_user(&admin(), target.user_id()).unwrap();
    assert_eq!(store.list(&target).unwrap().len(), 0);
    assert_eq!(store.provider().inner.len(), 1);
}
