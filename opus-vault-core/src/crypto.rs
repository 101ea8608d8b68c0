use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::{aead::Aead, KeyInit, XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use opus_vault_spec::{EncryptionAlgorithm, Envelope, Result, VaultError};
use rand::RngCore;
use ring::aead;
use sha2::Sha256;
use std::fmt;

/// Key length shared by both supported algorithms.
pub const KEY_LEN: usize = 32;

const TAG_LEN: usize = 16;
const AES_NONCE_LEN: usize = EncryptionAlgorithm::Aes256Gcm.nonce_len();
const XCHACHA_NONCE_LEN: usize = EncryptionAlgorithm::XChaCha20Poly1305.nonce_len();
const DERIVE_INFO: &[u8] = b"opus-vault artefact key v1";

/// Symmetric key protecting every artefact in a vault.
#[derive(Clone)]
pub struct MasterKey([u8; KEY_LEN]);

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

impl MasterKey {
    /// Wrap raw key bytes. The slice must be exactly [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| VaultError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(key))
    }

    /// Decode a standard-base64 key, as supplied through configuration.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|err| VaultError::Crypto(format!("master key is not valid base64: {err}")))?;
        Self::from_bytes(&decoded)
    }

    /// Derive a key from a secret and salt with HKDF-SHA256.
    ///
    /// The same secret and salt always yield the same key, so a vault can be
    /// reopened from configuration without storing key material.
    pub fn derive(secret: &[u8], salt: &[u8]) -> Result<Self> {
        let hkdf = Hkdf::<Sha256>::new(Some(salt), secret);
        let mut okm = [0u8; KEY_LEN];
        hkdf.expand(DERIVE_INFO, &mut okm)
            .map_err(|_| VaultError::Crypto("failed to derive key material".into()))?;
        Ok(Self(okm))
    }

    /// Generate a throwaway key. Anything encrypted under it is unreadable
    /// once the key is dropped.
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Seals and opens artefact content under a single master key.
///
/// Every encryption draws a fresh random nonce, so re-encrypting identical
/// plaintext never reuses a (key, nonce) pair.
#[derive(Debug, Clone)]
pub struct ArtefactCipher {
    algorithm: EncryptionAlgorithm,
    key: MasterKey,
}

impl ArtefactCipher {
    /// Construct a cipher for the given algorithm.
    pub fn new(key: MasterKey, algorithm: EncryptionAlgorithm) -> Self {
        Self { algorithm, key }
    }

    /// Algorithm applied to new encryptions.
    pub fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    /// Encrypt plaintext, returning the ciphertext and the envelope needed
    /// to open it again.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, Envelope)> {
        let (nonce, ciphertext) = match self.algorithm {
            EncryptionAlgorithm::Aes256Gcm => seal_aes_gcm(self.key.as_bytes(), plaintext)?,
            EncryptionAlgorithm::XChaCha20Poly1305 => seal_xchacha(self.key.as_bytes(), plaintext)?,
        };
        Ok((
            ciphertext,
            Envelope {
                algorithm: self.algorithm,
                nonce,
            },
        ))
    }

    /// Decrypt ciphertext sealed by [`encrypt`](Self::encrypt).
    ///
    /// Dispatches on the envelope's algorithm rather than the cipher's, so
    /// records written before an algorithm switch stay readable.
    pub fn decrypt(&self, envelope: &Envelope, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match envelope.algorithm {
            EncryptionAlgorithm::Aes256Gcm => {
                open_aes_gcm(self.key.as_bytes(), &envelope.nonce, ciphertext)
            }
            EncryptionAlgorithm::XChaCha20Poly1305 => {
                open_xchacha(self.key.as_bytes(), &envelope.nonce, ciphertext)
            }
        }
    }
}

fn seal_aes_gcm(key_bytes: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut nonce = [0u8; AES_NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let key = aead::UnboundKey::new(&aead::AES_256_GCM, key_bytes)
        .map_err(|_| VaultError::Crypto("invalid key".into()))?;
    let key = aead::LessSafeKey::new(key);

    let mut in_out = plaintext.to_vec();
    in_out.reserve(TAG_LEN);
    key.seal_in_place_append_tag(
        aead::Nonce::assume_unique_for_key(nonce),
        aead::Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| VaultError::Crypto("seal failed".into()))?;

    Ok((nonce.to_vec(), in_out))
}

fn open_aes_gcm(key_bytes: &[u8; KEY_LEN], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let key = aead::UnboundKey::new(&aead::AES_256_GCM, key_bytes)
        .map_err(|_| VaultError::Crypto("invalid key".into()))?;
    let key = aead::LessSafeKey::new(key);

    let mut buffer = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(
            aead::Nonce::try_assume_unique_for_key(nonce)
                .map_err(|_| VaultError::Crypto("invalid nonce length".into()))?,
            aead::Aad::empty(),
            &mut buffer,
        )
        .map_err(|_| VaultError::MacMismatch)?;

    Ok(plaintext.to_vec())
}

fn seal_xchacha(key_bytes: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let cipher = XChaCha20Poly1305::new_from_slice(key_bytes)
        .map_err(|_| VaultError::Crypto("invalid XChaCha key".into()))?;
    let nonce_bytes = random_bytes(XCHACHA_NONCE_LEN);
    let nonce_array: &[u8; XCHACHA_NONCE_LEN] = nonce_bytes
        .as_slice()
        .try_into()
        .map_err(|_| VaultError::Crypto("invalid XChaCha nonce length".into()))?;
    let nonce = XNonce::from(*nonce_array);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| VaultError::Crypto("failed to encrypt payload".into()))?;
    Ok((nonce_bytes, ciphertext))
}

fn open_xchacha(key_bytes: &[u8; KEY_LEN], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key_bytes)
        .map_err(|_| VaultError::Crypto("invalid XChaCha key".into()))?;
    let nonce_array: &[u8; XCHACHA_NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| VaultError::Crypto("invalid XChaCha nonce length".into()))?;
    let nonce = XNonce::from(*nonce_array);
    cipher
        .decrypt(&nonce, ciphertext)
        .map_err(|_| VaultError::MacMismatch)
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut buffer);
    buffer
}
