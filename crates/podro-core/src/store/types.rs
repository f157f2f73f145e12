//! Store document types, display schema, and store error definitions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The whole store document: module name → keyed values, plus the
/// reserved [`SCHEMA_KEY`] entry. Entry order is insertion order and
/// survives serialization.
pub type StoreMap = serde_json::Map<String, serde_json::Value>;

/// Reserved top-level key carrying display metadata. Excluded from data
/// iteration, but persisted inside the same document as the modules.
pub const SCHEMA_KEY: &str = "_schema";

/// Suggested file name for exported documents.
pub const EXPORT_FILE_NAME: &str = "datastore.json";

// ==============================================================================
// Display Schema
// ==============================================================================

/// Human-readable labels for the three logical roles of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaLabels {
    pub module: String,
    pub key: String,
    pub value: String,
}

impl Default for SchemaLabels {
    fn default() -> Self {
        Self {
            module: "Module".to_string(),
            key: "Key".to_string(),
            value: "Item".to_string(),
        }
    }
}

/// Optional metadata stored under [`SCHEMA_KEY`]. The store carries it
/// verbatim; only consumers interpret it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub labels: SchemaLabels,
}

// ==============================================================================
// Export
// ==============================================================================

/// An exported document: detached bytes plus the suggested download name.
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
}

// ==============================================================================
// Errors
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("module name must not be empty")]
    EmptyModule,

    #[error("key name must not be empty")]
    EmptyKey,

    #[error("imported document root must be a JSON object")]
    RootNotObject,

    #[error("imported document is not valid JSON: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
