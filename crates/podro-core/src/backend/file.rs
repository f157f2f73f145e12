//! File-backed storage — one JSON document at a fixed path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::CoreError;

use super::StorageBackend;

/// Keeps the whole store document in a single file on disk.
///
/// A missing file reads as "no data". Writes go through a sibling temp
/// file plus rename, so an interrupted write leaves the previous document
/// intact rather than a truncated one.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn read(&self) -> Result<Option<Vec<u8>>, CoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
