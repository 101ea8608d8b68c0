use thiserror::Error;

/// Result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Canonical error surface for the artefact vault.
///
/// Every failure a caller can observe is one of these variants; nothing is
/// swallowed or downgraded to a panic. The integrity variants are kept
/// separate so the two signals (authentication tag, plaintext digest) stay
/// distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("{field} must not be empty")]
    EmptyComponent { field: &'static str },
    #[error("{field} contains invalid characters: {value}")]
    InvalidCharacters { field: &'static str, value: String },
    #[error("artefact content must not be empty")]
    EmptyContent,
    #[error("unsupported artefact kind: {0}")]
    UnsupportedKind(String),
    #[error("encryption algorithm not supported: {0}")]
    UnsupportedAlgorithm(String),
    #[error("access denied: cannot {action}")]
    AccessDenied { action: &'static str },
    #[error("{entity} not found")]
    NotFound { entity: String },
    #[error("message authentication failed")]
    MacMismatch,
    #[error("checksum mismatch for {entity}")]
    ChecksumMismatch { entity: String },
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl VaultError {
    /// True for either integrity signal: a failed authentication tag or a
    /// plaintext digest that no longer matches.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::MacMismatch | Self::ChecksumMismatch { .. })
    }
}
