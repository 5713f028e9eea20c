//! JSON Schema pass.
//!
//! Every object level gets `type`, `properties` (possibly empty), a
//! `required` list only when some child is required, and the metadata's
//! `additionalProperties` toggle. Constraints become keywords only when
//! set and only when they apply to the node's type:
//!
//! | Type                | Keywords                                    |
//! |---------------------|---------------------------------------------|
//! | `string`            | `minLength`, `maxLength`, `pattern`         |
//! | `integer`           | `minimum`, `maximum`                        |
//! | `number`            | `minimum`, `maximum`, `multipleOf`          |
//! | any non-container   | `format`, `enum`                            |

use serde_json::{Map, Number, Value};

use crate::model::{PropertyNode, PropertyType, SchemaMetadata};
use crate::tree::PropertyTree;

use super::{child_path, items_path, Compiled, CompilerWarning, WarningKind};

/// Compile a tree into a JSON Schema document.
pub fn validation_schema(tree: &PropertyTree, metadata: &SchemaMetadata) -> Compiled {
    let mut pass = SchemaPass {
        additional_properties: metadata.additional_properties,
        warnings: Vec::new(),
    };

    let mut root = Map::new();
    root.insert("type".into(), Value::from("object"));
    if !metadata.title.trim().is_empty() {
        root.insert("title".into(), Value::from(metadata.title.as_str()));
    }
    if let Some(description) = non_empty(metadata.description.as_deref()) {
        root.insert("description".into(), Value::from(description));
    }
    pass.object_body(&mut root, tree.properties(), "");

    Compiled {
        document: Value::Object(root),
        warnings: pass.warnings,
    }
}

struct SchemaPass {
    additional_properties: bool,
    warnings: Vec<CompilerWarning>,
}

impl SchemaPass {
    fn warn(&mut self, node: &PropertyNode, path: &str, kind: WarningKind) {
        self.warnings.push(CompilerWarning {
            node_id: node.id(),
            path: path.to_string(),
            kind,
        });
    }

    /// `properties`, `required` and `additionalProperties` for one object
    /// level.
    fn object_body(
        &mut self,
        schema: &mut Map<String, Value>,
        children: &[PropertyNode],
        path: &str,
    ) {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for child in children {
            let at = child_path(path, child.name());
            if child.name().is_empty() {
                self.warn(child, &at, WarningKind::EmptyName);
            }
            if properties.contains_key(child.name()) {
                // First sibling keeps the schema; the name is still required
                // if any sibling carrying it is.
                self.warn(child, &at, WarningKind::DuplicateName);
            } else {
                let compiled = self.node_schema(child, &at);
                properties.insert(child.name().to_string(), compiled);
            }
            let name = Value::from(child.name());
            if child.is_required() && !required.contains(&name) {
                required.push(name);
            }
        }

        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        schema.insert(
            "additionalProperties".into(),
            Value::Bool(self.additional_properties),
        );
    }

    fn node_schema(&mut self, node: &PropertyNode, path: &str) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), Value::from(node.property_type().as_str()));
        if let Some(title) = non_empty(node.display_name()) {
            schema.insert("title".into(), Value::from(title));
        }
        if let Some(description) = non_empty(node.description()) {
            schema.insert("description".into(), Value::from(description));
        }

        match node.property_type() {
            PropertyType::Object => self.object_body(&mut schema, node.properties(), path),
            PropertyType::Array => match node.items() {
                Some(items) => {
                    let compiled = self.node_schema(items, &items_path(path));
                    schema.insert("items".into(), compiled);
                }
                None => self.warn(node, path, WarningKind::MissingItems),
            },
            _ => leaf_constraints(&mut schema, node),
        }

        Value::Object(schema)
    }
}

fn leaf_constraints(schema: &mut Map<String, Value>, node: &PropertyNode) {
    let Some(c) = node.constraints() else {
        return;
    };

    match node.property_type() {
        PropertyType::String => {
            if let Some(min) = c.min_length {
                schema.insert("minLength".into(), Value::from(min));
            }
            if let Some(max) = c.max_length {
                schema.insert("maxLength".into(), Value::from(max));
            }
            if let Some(pattern) = &c.pattern {
                schema.insert("pattern".into(), Value::from(pattern.as_str()));
            }
        }
        PropertyType::Integer | PropertyType::Number => {
            if let Some(min) = c.minimum.and_then(number) {
                schema.insert("minimum".into(), min);
            }
            if let Some(max) = c.maximum.and_then(number) {
                schema.insert("maximum".into(), max);
            }
            if node.property_type() == PropertyType::Number {
                if let Some(step) = c.precision.and_then(precision_step) {
                    schema.insert("multipleOf".into(), step);
                }
            }
        }
        _ => {}
    }

    if let Some(format) = &c.format {
        schema.insert("format".into(), Value::from(format.as_str()));
    }
    if !c.enum_values.is_empty() {
        schema.insert("enum".into(), Value::Array(c.enum_values.clone()));
    }
}

/// Whole numbers render as JSON integers (`18`, not `18.0`). Non-finite
/// values have no JSON form and are dropped.
fn number(value: f64) -> Option<Value> {
    const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        return Some(Value::from(value as i64));
    }
    Number::from_f64(value).map(Value::Number)
}

/// `multipleOf` for `p` decimal places: `10^-p`. Parsed from the decimal
/// literal so that e.g. two places is exactly `0.01`.
fn precision_step(places: u32) -> Option<Value> {
    let step: f64 = format!("1e-{places}").parse().ok()?;
    (step > 0.0).then(|| number(step)).flatten()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
