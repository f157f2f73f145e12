//! In-memory storage — an ephemeral document with an optional byte quota.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CoreError;

use super::StorageBackend;

/// Holds the store document in memory, for no-persistence sessions and
/// tests. With [`MemoryBackend::with_capacity`], writes larger than the
/// capacity are rejected the way a full browser storage bucket rejects
/// them; the previous document stays in place.
pub struct MemoryBackend {
    blob: Mutex<Option<Vec<u8>>>,
    capacity: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            blob: Mutex::new(None),
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blob: Mutex::new(None),
            capacity: Some(capacity),
        }
    }

    /// Seed the backend with raw bytes, bypassing the store write path.
    /// Exists so tests can plant corrupt or hand-built documents.
    pub async fn seed(&self, bytes: impl Into<Vec<u8>>) {
        *self.blob.lock().await = Some(bytes.into());
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self.blob.lock().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), CoreError> {
        if let Some(capacity) = self.capacity {
            if bytes.len() > capacity {
                return Err(CoreError::QuotaExceeded {
                    attempted: bytes.len(),
                    capacity,
                });
            }
        }
        *self.blob.lock().await = Some(bytes.to_vec());
        Ok(())
    }
}
