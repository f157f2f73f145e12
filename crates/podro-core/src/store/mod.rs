//! The Pocket DRO settings store.
//!
//! A single JSON document maps module names to key/value groups, with one
//! reserved `_schema` entry carrying display labels. Provides the store
//! operations, strict import / pretty export, and lenient decoding of the
//! persisted document.

mod json;
mod store;
mod types;

pub use store::DataStore;
pub use types::{Export, Schema, SchemaLabels, StoreError, StoreMap, EXPORT_FILE_NAME, SCHEMA_KEY};
