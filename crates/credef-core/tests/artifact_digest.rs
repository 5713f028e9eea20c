//! Digest stability tests.
//!
//! A compiled artifact is hashed after canonicalization, so digests must be
//! stable across repeated runs and independent of object key insertion
//! order. These are the properties the publish step relies on to decide
//! whether a preview differs from what was last saved.

use credef_core::{sha256_digest, CanonicalBytes};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn digest_hex(value: &Value) -> String {
    let cb = CanonicalBytes::new(value).expect("canonicalization should succeed");
    sha256_digest(&cb).to_hex()
}

#[test]
fn test_schema_shaped_document_digest_is_stable() {
    let doc = serde_json::json!({
        "type": "object",
        "properties": {"full_name": {"type": "string"}},
        "required": ["full_name"],
        "additionalProperties": false
    });
    assert_eq!(digest_hex(&doc), digest_hex(&doc.clone()));
}

proptest! {
    #[test]
    fn digest_ignores_key_insertion_order(
        entries in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12)
    ) {
        let mut forward = Map::new();
        for (k, v) in &entries {
            forward.insert(k.clone(), Value::from(*v));
        }
        let mut backward = Map::new();
        for (k, v) in entries.iter().rev() {
            backward.insert(k.clone(), Value::from(*v));
        }
        prop_assert_eq!(
            digest_hex(&Value::Object(forward)),
            digest_hex(&Value::Object(backward))
        );
    }

    #[test]
    fn canonical_bytes_are_valid_json(
        entries in prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,16}", 0..12)
    ) {
        let value = serde_json::to_value(&entries).unwrap();
        let cb = CanonicalBytes::new(&value).unwrap();
        let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
        prop_assert_eq!(parsed, value);
    }
}
