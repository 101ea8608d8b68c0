//! Shared contracts for the artefact vault: identifiers, record shapes,
//! error taxonomy, and the storage provider trait.
//!
//! This crate stays dependency-light so alternative engines and providers
//! can agree on the same types without pulling in cryptography.

pub mod error;
pub mod identity;
pub mod record;
pub mod storage;

pub use error::{Result, VaultError};
pub use identity::{Identity, IdentityProvider, Role, UserId};
pub use record::{
    ArtefactId, ArtefactKind, ArtefactRecord, ArtefactSummary, Checksum, EncryptionAlgorithm,
    Envelope,
};
pub use storage::{DynStorageProvider, StorageProvider};
