//! JSON serialization for the store document.
//!
//! Import parsing is strict and surfaces parse and shape errors to the
//! caller. Decoding the persisted document is lenient: anything unreadable
//! decodes to the empty store.

use serde_json::Value;

use super::types::{Schema, StoreError, StoreMap, SCHEMA_KEY};

/// Parse imported file content. The root must be a plain JSON object;
/// its keys become the new store's module names (and `_schema` when
/// included).
pub(super) fn parse_import(content: &str) -> Result<StoreMap, StoreError> {
    let value: Value = serde_json::from_str(content).map_err(|e| StoreError::Parse {
        message: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::RootNotObject),
    }
}

/// Decode the persisted document. Missing, corrupt, or non-object data all
/// decode to the empty store — the tool must still start when the stored
/// document has gone bad.
pub(super) fn parse_lenient(bytes: Option<&[u8]>) -> StoreMap {
    let Some(bytes) = bytes else {
        return StoreMap::new();
    };

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(
                found = json_type_name(&other),
                "persisted store root is not an object; starting empty"
            );
            StoreMap::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "persisted store is not valid JSON; starting empty");
            StoreMap::new()
        }
    }
}

/// Serialize a document for export: 2-space pretty JSON with `_schema`
/// first (synthesized from the defaults when the store carries none),
/// then the modules in stored order.
pub(super) fn export_pretty(store: &StoreMap) -> Vec<u8> {
    let mut ordered = StoreMap::new();

    let schema = store.get(SCHEMA_KEY).cloned().unwrap_or_else(|| {
        serde_json::to_value(Schema::default()).expect("default schema serializes")
    });
    ordered.insert(SCHEMA_KEY.to_string(), schema);

    for (name, value) in store {
        if name != SCHEMA_KEY {
            ordered.insert(name.clone(), value.clone());
        }
    }

    let mut bytes = serde_json::to_vec_pretty(&ordered).expect("store document serializes");
    bytes.push(b'\n');
    bytes
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn import_accepts_object_root() {
        let map = parse_import(r#"{"machine": {"xTravel": 200}}"#).expect("object root imports");
        assert_eq!(map.get("machine"), Some(&json!({"xTravel": 200})));
    }

    #[test]
    fn import_rejects_array_root() {
        assert!(matches!(
            parse_import("[1,2,3]"),
            Err(StoreError::RootNotObject)
        ));
    }

    #[test]
    fn import_rejects_scalar_and_null_roots() {
        assert!(matches!(
            parse_import("42"),
            Err(StoreError::RootNotObject)
        ));
        assert!(matches!(
            parse_import("null"),
            Err(StoreError::RootNotObject)
        ));
    }

    #[test]
    fn import_rejects_malformed_json() {
        assert!(matches!(
            parse_import("{not json"),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn lenient_decode_swallows_garbage() {
        assert!(parse_lenient(None).is_empty());
        assert!(parse_lenient(Some(b"{not json")).is_empty());
        assert!(parse_lenient(Some(b"[1,2,3]")).is_empty());
    }

    #[test]
    fn export_puts_default_schema_first() {
        let mut store = StoreMap::new();
        store.insert("machine".into(), json!({"xTravel": 200}));

        let bytes = export_pretty(&store);
        let text = String::from_utf8(bytes).expect("export is UTF-8");

        // `_schema` must be the first key in the serialized document.
        let schema_pos = text.find("\"_schema\"").expect("schema present");
        let machine_pos = text.find("\"machine\"").expect("module present");
        assert!(schema_pos < machine_pos);

        let parsed: serde_json::Value = serde_json::from_str(&text).expect("export parses");
        assert_eq!(
            parsed["_schema"]["labels"],
            json!({"module": "Module", "key": "Key", "value": "Item"})
        );
    }

    #[test]
    fn export_keeps_stored_schema_and_module_order() {
        let mut store = StoreMap::new();
        store.insert("zebra".into(), json!({"a": 1}));
        store.insert(
            SCHEMA_KEY.into(),
            json!({"labels": {"module": "Bereich", "key": "Name", "value": "Wert"}}),
        );
        store.insert("alpha".into(), json!({"b": 2}));

        let text = String::from_utf8(export_pretty(&store)).expect("export is UTF-8");
        let parsed = parse_import(&text).expect("export re-imports");

        let keys: Vec<_> = parsed.keys().cloned().collect();
        assert_eq!(keys, vec!["_schema", "zebra", "alpha"]);
        assert_eq!(parsed["_schema"]["labels"]["module"], "Bereich");
    }

    #[test]
    fn export_uses_two_space_indent() {
        let mut store = StoreMap::new();
        store.insert("machine".into(), json!({"xTravel": 200}));

        let text = String::from_utf8(export_pretty(&store)).expect("export is UTF-8");
        assert!(text.contains("\n  \"_schema\""));
        assert!(text.ends_with('\n'));
    }
}
