//! Storage backends — where the serialized store document lives.
//!
//! The store core is backend-agnostic: a backend only has to hand back the
//! last document it was given (or nothing), and accept a full replacement.
//! Two implementations ship with the crate: [`FileBackend`] for a JSON file
//! on disk and [`MemoryBackend`] for ephemeral, quota-capped storage.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::error::CoreError;

/// A durable home for the single serialized store document.
///
/// `read` returns `None` when nothing has ever been written. `write`
/// replaces the whole document; a partially applied write must never be
/// observable by a later `read`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn read(&self) -> Result<Option<Vec<u8>>, CoreError>;
    async fn write(&self, bytes: &[u8]) -> Result<(), CoreError>;
}
