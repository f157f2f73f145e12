//! `DataStore` — module/key/value persistence over a pluggable backend.
//!
//! Every operation re-reads the whole persisted document, applies its
//! change, and writes the whole document back; there is no per-key
//! isolation. The process owning the backend is the single writer, and
//! callers needing mutual exclusion serialize operations themselves (the
//! bundled server holds the store behind one `RwLock`).
//!
//! Reads are lenient: missing or corrupt persisted data decodes to an
//! empty store. Writes are strict: empty identifiers, unparseable imports
//! and rejected backend writes all surface to the caller.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::StorageBackend;

use super::json::{export_pretty, parse_import, parse_lenient};
use super::types::{Export, Schema, StoreError, StoreMap, EXPORT_FILE_NAME, SCHEMA_KEY};

pub struct DataStore {
    backend: Arc<dyn StorageBackend>,
}

impl DataStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The full current document, `_schema` included. Unreadable or
    /// corrupt persisted data reads as an empty store, never as an error.
    pub async fn all_items(&self) -> StoreMap {
        self.read_map().await
    }

    /// The value at `(module, key)`, or `None` when either is absent.
    pub async fn get_item(&self, module: &str, key: &str) -> Result<Option<Value>, StoreError> {
        validate_names(module, key)?;

        let map = self.read_map().await;
        Ok(map
            .get(module)
            .and_then(Value::as_object)
            .and_then(|m| m.get(key))
            .cloned())
    }

    /// Names of the data modules, in stored order. The reserved schema
    /// entry is not a module.
    pub async fn module_names(&self) -> Vec<String> {
        self.read_map()
            .await
            .keys()
            .filter(|name| name.as_str() != SCHEMA_KEY)
            .cloned()
            .collect()
    }

    /// Best-effort decode of the stored `_schema` entry. Missing or
    /// non-conforming metadata is `None`.
    pub async fn schema(&self) -> Option<Schema> {
        self.read_map()
            .await
            .get(SCHEMA_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Set `(module, key)` to `value`, creating the module as needed and
    /// unconditionally overwriting any previous value.
    pub async fn set_item(&self, module: &str, key: &str, value: Value) -> Result<(), StoreError> {
        validate_names(module, key)?;

        let mut map = self.read_map().await;
        // The write path only ever produces object modules. A non-object
        // slot can exist after an import; it cannot hold keys, so it is
        // replaced. `insert` on an existing name keeps its position.
        if !matches!(map.get(module), Some(Value::Object(_))) {
            map.insert(module.to_string(), Value::Object(StoreMap::new()));
        }
        let module_map = map
            .get_mut(module)
            .and_then(Value::as_object_mut)
            .expect("module slot was just made an object");
        module_map.insert(key.to_string(), value);

        self.write_map(&map).await
    }

    /// Remove `key` from `module`; a module left with no keys is removed
    /// from the document entirely. Absent module or key is a no-op.
    pub async fn delete_item(&self, module: &str, key: &str) -> Result<(), StoreError> {
        validate_names(module, key)?;

        let mut map = self.read_map().await;
        let Some(module_map) = map.get_mut(module).and_then(Value::as_object_mut) else {
            return Ok(());
        };
        if module_map.shift_remove(key).is_none() {
            return Ok(());
        }
        if module_map.is_empty() {
            map.shift_remove(module);
        }

        self.write_map(&map).await
    }

    /// Replace the whole document with the empty one. The schema entry
    /// is discarded along with the data.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.write_map(&StoreMap::new()).await
    }

    /// Validate `content` wholly in memory, then replace the entire
    /// document with it. Nothing is merged: modules absent from the
    /// imported file are gone afterwards. On any error the persisted
    /// document is untouched.
    pub async fn import_json(&self, content: &str) -> Result<(), StoreError> {
        let map = parse_import(content)?;
        self.write_map(&map).await
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Pretty-printed export bytes plus the suggested download name.
    /// Synthesizes default display labels when the store carries none;
    /// the persisted document itself is not modified.
    pub async fn export_json(&self) -> Export {
        let map = self.read_map().await;
        Export {
            bytes: export_pretty(&map),
            file_name: EXPORT_FILE_NAME,
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    async fn read_map(&self) -> StoreMap {
        match self.backend.read().await {
            Ok(bytes) => parse_lenient(bytes.as_deref()),
            Err(e) => {
                tracing::warn!(error = %e, "storage read failed; treating store as empty");
                StoreMap::new()
            }
        }
    }

    async fn write_map(&self, map: &StoreMap) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(map).expect("store document serializes");
        self.backend.write(&bytes).await.map_err(StoreError::from)
    }
}

fn validate_names(module: &str, key: &str) -> Result<(), StoreError> {
    if module.trim().is_empty() {
        return Err(StoreError::EmptyModule);
    }
    if key.trim().is_empty() {
        return Err(StoreError::EmptyKey);
    }
    Ok(())
}
