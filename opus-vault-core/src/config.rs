use crate::backend::{FileProvider, MemoryProvider};
use crate::crypto::{ArtefactCipher, MasterKey};
use crate::store::ArtefactStore;
use opus_vault_spec::{EncryptionAlgorithm, Result, StorageProvider};

/// Environment variable supplying the master key as standard base64.
pub const MASTER_KEY_ENV: &str = "OPUS_VAULT_MASTER_KEY";
/// Environment variable supplying a derivation secret (paired with the salt).
pub const SECRET_ENV: &str = "OPUS_VAULT_SECRET";
/// Environment variable supplying the derivation salt.
pub const SALT_ENV: &str = "OPUS_VAULT_SALT";
/// Environment variable selecting the encryption algorithm.
pub const ALGO_ENV: &str = "OPUS_VAULT_ALGO";
/// Environment variable pointing the file provider at a directory.
pub const DIR_ENV: &str = "OPUS_VAULT_DIR";

/// Builder for [`ArtefactStore`] instances with a type-erased provider.
#[derive(Default)]
pub struct VaultBuilder {
    key: Option<MasterKey>,
    algorithm: Option<EncryptionAlgorithm>,
    provider: Option<Box<dyn StorageProvider>>,
}

impl VaultBuilder {
    /// Initialise the builder from environment configuration.
    ///
    /// * `OPUS_VAULT_MASTER_KEY` supplies the master key as standard base64.
    /// * `OPUS_VAULT_SECRET` and `OPUS_VAULT_SALT` derive the key instead
    ///   when no explicit key is set.
    /// * `OPUS_VAULT_ALGO` selects the algorithm (`aes256gcm` or `xchacha`).
    /// * `OPUS_VAULT_DIR` stores records under a directory instead of in
    ///   memory.
    ///
    /// Unset or blank variables leave the corresponding default in place.
    pub fn from_env() -> Result<Self> {
        let mut builder = VaultBuilder::default();

        if let Some(encoded) = read_env(MASTER_KEY_ENV) {
            builder.key = Some(MasterKey::from_base64(&encoded)?);
        } else if let (Some(secret), Some(salt)) = (read_env(SECRET_ENV), read_env(SALT_ENV)) {
            builder.key = Some(MasterKey::derive(secret.as_bytes(), salt.as_bytes())?);
        }

        if let Some(algo) = read_env(ALGO_ENV) {
            builder.algorithm = Some(algo.parse()?);
        }

        if let Some(dir) = read_env(DIR_ENV) {
            builder.provider = Some(Box::new(FileProvider::new(dir)));
        }

        Ok(builder)
    }

    /// Set the master key explicitly.
    pub fn master_key(mut self, key: MasterKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the algorithm applied to new encryptions.
    pub fn algorithm(mut self, algorithm: EncryptionAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set the storage provider.
    pub fn provider<P>(mut self, provider: P) -> Self
    where
        P: StorageProvider + 'static,
    {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the store, filling gaps with defaults: a fresh random master
    /// key and an in-memory provider.
    ///
    /// A durable deployment must pin the key through
    /// [`master_key`](Self::master_key) or the environment; under a random
    /// key, records from earlier runs cannot be decrypted.
    pub fn build(self) -> ArtefactStore<Box<dyn StorageProvider>> {
        let key = self.key.unwrap_or_else(MasterKey::random);
        let algorithm = self.algorithm.unwrap_or_default();
        let provider = self
            .provider
            .unwrap_or_else(|| Box::new(MemoryProvider::new()));
        ArtefactStore::new(provider, ArtefactCipher::new(key, algorithm))
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opus_vault_spec::{ArtefactKind, Identity, Role, UserId};

    fn user(name: &str) -> Identity {
        Identity::new(UserId::new(name).unwrap(), Role::User)
    }

    #[test]
    fn defaults_build_a_working_store() {
        let store = VaultBuilder::default().build();
        let alice = user("alice");

        let record = store
            .create(&alice, "Song A", ArtefactKind::Lyrics, b"la la la")
            .unwrap();
        assert_eq!(store.read(&alice, &record.id).unwrap(), b"la la la");
    }

    #[test]
    fn explicit_pieces_are_honoured() {
        let store = VaultBuilder::default()
            .master_key(MasterKey::derive(b"passphrase", b"studio").unwrap())
            .algorithm(EncryptionAlgorithm::XChaCha20Poly1305)
            .provider(MemoryProvider::new())
            .build();
        let alice = user("alice");

        let record = store
            .create(&alice, "Song B", ArtefactKind::Audio, b"demo take")
            .unwrap();
        assert_eq!(
            record.envelope.algorithm,
            EncryptionAlgorithm::XChaCha20Poly1305
        );
        assert_eq!(store.read(&alice, &record.id).unwrap(), b"demo take");
    }
}
