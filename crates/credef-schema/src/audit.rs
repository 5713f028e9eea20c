//! # Strictness Audit
//!
//! The metadata `additionalProperties` toggle must hold at every object
//! level of a schema, not only the root. [`audit_strictness`] walks a
//! schema document (compiled here or edited by hand after export) and
//! reports every object level where the keyword is absent or disagrees.

use serde_json::Value;

/// One object level whose `additionalProperties` does not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictnessFinding {
    /// JSON Pointer to the offending `additionalProperties` keyword.
    pub json_path: String,
    /// The value found, or a note that it is absent.
    pub current_value: String,
    pub expected: bool,
}

impl std::fmt::Display for StrictnessFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  {}: {} (expected {})",
            self.json_path, self.current_value, self.expected
        )
    }
}

/// Report every object level whose `additionalProperties` is not
/// `expected`. An empty result means the schema is uniformly strict (or
/// uniformly open).
pub fn audit_strictness(schema: &Value, expected: bool) -> Vec<StrictnessFinding> {
    let mut findings = Vec::new();
    audit_level(schema, "", expected, &mut findings);
    findings
}

fn audit_level(schema: &Value, path: &str, expected: bool, findings: &mut Vec<StrictnessFinding>) {
    let is_object = schema.get("type") == Some(&Value::String("object".to_string()))
        || schema.get("properties").is_some();

    if is_object {
        let current = schema.get("additionalProperties");
        if current != Some(&Value::Bool(expected)) {
            findings.push(StrictnessFinding {
                json_path: format!("{path}/additionalProperties"),
                current_value: current
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "(absent, defaults to true)".to_string()),
                expected,
            });
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, child) in properties {
            let child_path = format!("{path}/properties/{}", escape_pointer(name));
            audit_level(child, &child_path, expected, findings);
        }
    }
    if let Some(items) = schema.get("items") {
        audit_level(items, &format!("{path}/items"), expected, findings);
    }
}

/// RFC 6901 escaping for one pointer segment.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uniform_schema_has_no_findings() {
        let schema = json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}},
                    "additionalProperties": false
                }
            },
            "additionalProperties": false
        });
        assert!(audit_strictness(&schema, false).is_empty());
    }

    #[test]
    fn test_nested_level_reported() {
        let schema = json!({
            "type": "object",
            "properties": {
                "address": {"type": "object", "properties": {}, "additionalProperties": true}
            },
            "additionalProperties": false
        });
        let findings = audit_strictness(&schema, false);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].json_path, "/properties/address/additionalProperties");
        assert_eq!(findings[0].current_value, "true");
    }

    #[test]
    fn test_absent_keyword_reported_under_items() {
        let schema = json!({
            "type": "object",
            "properties": {
                "owners": {"type": "array", "items": {"type": "object", "properties": {}}}
            },
            "additionalProperties": true
        });
        let findings = audit_strictness(&schema, true);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].json_path, "/properties/owners/items/additionalProperties");
        assert!(findings[0].current_value.contains("absent"));
    }

    #[test]
    fn test_pointer_escaping() {
        let schema = json!({
            "type": "object",
            "properties": {"a/b": {"type": "object", "properties": {}}},
            "additionalProperties": false
        });
        let findings = audit_strictness(&schema, false);
        assert_eq!(findings[0].json_path, "/properties/a~1b/additionalProperties");
    }
}
