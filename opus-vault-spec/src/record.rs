use crate::error::{Result, VaultError};
use crate::identity::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

fn validate_name(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::EmptyComponent {
            field: "artefact name",
        });
    }
    Ok(())
}

/// Unique identifier assigned to an artefact at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtefactId(Uuid);

impl ArtefactId {
    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArtefactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Category of managed artefact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArtefactKind {
    /// Song text.
    Lyrics,
    /// Sheet music or notation.
    Score,
    /// Recorded audio.
    Audio,
}

impl ArtefactKind {
    /// Stable string representation used for configuration and display.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lyrics => "lyrics",
            Self::Score => "score",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for ArtefactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtefactKind {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lyrics" => Ok(Self::Lyrics),
            "score" => Ok(Self::Score),
            "audio" => Ok(Self::Audio),
            other => Err(VaultError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Supported authenticated-encryption algorithms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionAlgorithm {
    /// AES-256-GCM with a 96-bit nonce.
    Aes256Gcm,
    /// XChaCha20-Poly1305 with a 192-bit nonce.
    XChaCha20Poly1305,
}

impl Default for EncryptionAlgorithm {
    fn default() -> Self {
        Self::Aes256Gcm
    }
}

impl EncryptionAlgorithm {
    /// Returns the nonce length required by the algorithm.
    pub const fn nonce_len(self) -> usize {
        match self {
            Self::Aes256Gcm => 12,
            Self::XChaCha20Poly1305 => 24,
        }
    }

    /// Stable string representation used for configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aes256Gcm => "aes256gcm",
            Self::XChaCha20Poly1305 => "xchacha",
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "" => Ok(Self::default()),
            "aes256gcm" | "aes-256-gcm" => Ok(Self::Aes256Gcm),
            "xchacha" | "xchacha20poly1305" | "xchacha20-poly1305" => Ok(Self::XChaCha20Poly1305),
            other => Err(VaultError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// SHA-256 digest of an artefact's plaintext.
///
/// Stored beside the ciphertext as an integrity signal independent of the
/// AEAD authentication tag. Displays and serializes as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    /// Digest length in bytes.
    pub const LEN: usize = 32;

    /// Wrap a raw digest.
    pub const fn from_bytes(bytes: [u8; Checksum::LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; Checksum::LEN] {
        &self.0
    }

    /// Hex rendering for logs and messages.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Checksum {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        let digest: [u8; Checksum::LEN] = bytes.as_slice().try_into().map_err(|_| {
            serde::de::Error::custom(format!("checksum must be {} bytes", Checksum::LEN))
        })?;
        Ok(Self(digest))
    }
}

/// Envelope details required to decrypt an artefact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    pub algorithm: EncryptionAlgorithm,
    pub nonce: Vec<u8>,
}

/// The persisted unit: metadata, ciphertext, checksum, and audit timestamps.
///
/// `id`, `owner_id`, and `kind` are fixed at creation. The ciphertext,
/// envelope, and checksum are replaced wholesale on every content update so
/// a nonce is never reused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtefactRecord {
    pub id: ArtefactId,
    pub owner_id: UserId,
    pub name: String,
    pub kind: ArtefactKind,
    pub ciphertext: Vec<u8>,
    pub envelope: Envelope,
    pub checksum: Checksum,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ArtefactRecord {
    /// Construct a record with a validated name.
    ///
    /// Timestamps start at the Unix epoch; the repository's timestamp hook
    /// assigns real values before the record is persisted.
    pub fn new(
        id: ArtefactId,
        owner_id: UserId,
        name: impl Into<String>,
        kind: ArtefactKind,
        ciphertext: Vec<u8>,
        envelope: Envelope,
        checksum: Checksum,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id,
            owner_id,
            name,
            kind,
            ciphertext,
            envelope,
            checksum,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
    }

    /// Replace the human label. The label must not be blank.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

/// Metadata-only view of a record for listings. Carries no ciphertext and
/// no plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtefactSummary {
    pub id: ArtefactId,
    pub owner_id: UserId,
    pub name: String,
    pub kind: ArtefactKind,
    pub checksum: Checksum,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ArtefactSummary {
    /// Create a listing view from a full record.
    pub fn from_record(record: &ArtefactRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id.clone(),
            name: record.name.clone(),
            kind: record.kind,
            checksum: record.checksum,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
