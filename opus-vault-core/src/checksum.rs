use opus_vault_spec::Checksum;
use sha2::{Digest, Sha256};

/// Computes and verifies plaintext digests.
///
/// The digest is taken over the plaintext before encryption and checked
/// after decryption, so corruption is detectable even for a record whose
/// ciphertext still authenticates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChecksumService;

impl ChecksumService {
    /// SHA-256 over the given bytes.
    pub fn compute(data: &[u8]) -> Checksum {
        Checksum::from_bytes(Sha256::digest(data).into())
    }

    /// True when `data` hashes to `expected`.
    pub fn verify(data: &[u8], expected: &Checksum) -> bool {
        &Self::compute(data) == expected
    }
}
