use opus_vault_core::{
    ArtefactCipher, ArtefactKind, ArtefactStore, Checksum, EncryptionAlgorithm, FileProvider,
    Identity, MasterKey, MemoryProvider, Role, StorageProvider, UserId, VaultError,
};
use std::sync::Arc;
use tempfile::tempdir;

fn user(name: &str) -> Identity {
    Identity::new(UserId::new(name).unwrap(), Role::User)
}

#[test]
fn flipped_ciphertext_byte_fails_authentication() {
    let provider = Arc::new(MemoryProvider::new());
    let store = ArtefactStore::new(
        provider.clone(),
        ArtefactCipher::new(MasterKey::random(), EncryptionAlgorithm::Aes256Gcm),
    );
    let alice = user("alice");

    let record = store
        .create(&alice, "Song A", ArtefactKind::Lyrics, b"la la la")
        .unwrap();

    let mut stored = provider.get(&record.id).unwrap().unwrap();
    stored.ciphertext[0] ^= 0x01;
    provider.put(stored).unwrap();

    let err = store.read(&alice, &record.id).unwrap_err();
    assert!(matches!(err, VaultError::MacMismatch));
    assert!(err.is_integrity());
}

#[test]
fn corrupted_checksum_is_caught_after_decryption() {
    let provider = Arc::new(MemoryProvider::new());
    let store = ArtefactStore::new(
        provider.clone(),
        ArtefactCipher::new(MasterKey::random(), EncryptionAlgorithm::Aes256Gcm),
    );
    let alice = user("alice");

    let record = store
        .create(&alice, "Song A", ArtefactKind::Lyrics, b"la la la")
        .unwrap();

    // The ciphertext still authenticates; only the stored digest is wrong.
    let mut stored = provider.get(&record.id).unwrap().unwrap();
    stored.checksum = Checksum::from_bytes([0; Checksum::LEN]);
    provider.put(stored).unwrap();

    let err = store.read(&alice, &record.id).unwrap_err();
    assert!(matches!(err, VaultError::ChecksumMismatch { .. }));
    assert!(err.is_integrity());
}

#[test]
fn tampered_nonce_fails_authentication() {
    let provider = Arc::new(MemoryProvider::new());
    let store = ArtefactStore::new(
        provider.clone(),
        ArtefactCipher::new(MasterKey::random(), EncryptionAlgorithm::XChaCha20Poly1305),
    );
    let alice = user("alice");

    let record = store
        .create(&alice, "Song A", ArtefactKind::Audio, b"take one")
        .unwrap();

    let mut stored = provider.get(&record.id).unwrap().unwrap();
    stored.envelope.nonce[0] ^= 0xFF;
    provider.put(stored).unwrap();

    let err = store.read(&alice, &record.id).unwrap_err();
    assert!(matches!(err, VaultError::MacMismatch));
}

#[test]
fn vault_reopens_from_disk_with_the_same_key() {
    let dir = tempdir().unwrap();
    let key = MasterKey::derive(b"passphrase", b"studio-1").unwrap();
    let alice = user("alice");

    let record = {
        let store = ArtefactStore::new(
            FileProvider::new(dir.path()),
            ArtefactCipher::new(key.clone(), EncryptionAlgorithm::Aes256Gcm),
        );
        store
            .create(&alice, "Song A", ArtefactKind::Lyrics, b"la la la")
            .unwrap()
    };

    let reopened = ArtefactStore::new(
        FileProvider::new(dir.path()),
        ArtefactCipher::new(key, EncryptionAlgorithm::Aes256Gcm),
    );
    assert_eq!(reopened.read(&alice, &record.id).unwrap(), b"la la la");
    assert_eq!(reopened.list(&alice).unwrap().len(), 1);

    // A different key cannot open what is on disk.
    let wrong_key = ArtefactStore::new(
        FileProvider::new(dir.path()),
        ArtefactCipher::new(MasterKey::random(), EncryptionAlgorithm::Aes256Gcm),
    );
    assert!(matches!(
        wrong_key.read(&alice, &record.id).unwrap_err(),
        VaultError::MacMismatch
    ));
}
