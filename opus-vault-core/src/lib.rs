//! Artefact repository engine: encryption at rest, plaintext checksums,
//! owner-or-admin access control, and audit timestamps over pluggable
//! persistence.

pub mod backend;
pub mod checksum;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod policy;
pub mod stamp;
pub mod store;

pub use backend::{FileProvider, MemoryProvider};
pub use checksum::ChecksumService;
pub use config::VaultBuilder;
pub use crypto::{ArtefactCipher, MasterKey, KEY_LEN};
pub use identity::StaticTokenProvider;
pub use policy::AccessPolicy;
pub use stamp::TimestampObserver;
pub use store::ArtefactStore;

pub use opus_vault_spec::{
    ArtefactId, ArtefactKind, ArtefactRecord, ArtefactSummary, Checksum, DynStorageProvider,
    EncryptionAlgorithm, Envelope, Identity, IdentityProvider, Result, Role, StorageProvider,
    UserId, VaultError,
};
