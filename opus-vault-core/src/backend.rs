//! Bundled storage providers.
//!
//! Both providers store records exactly as handed to them; encryption and
//! policy live above this layer in [`ArtefactStore`](crate::store::ArtefactStore).

pub mod file;
pub mod memory;

pub use file::FileProvider;
pub use memory::MemoryProvider;
