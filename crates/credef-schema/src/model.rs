//! # Property Model
//!
//! The passive data contract of a credential definition: the recursive
//! [`PropertyNode`], its closed [`PropertyType`] union, optional
//! [`Constraints`], and the per-tree [`SchemaMetadata`].
//!
//! ## Ownership
//!
//! Children are owned by value. An `object` node owns its `properties`
//! vector and an `array` node owns its single boxed `items` node, so a node
//! can never become its own descendant. There is no "attach existing node"
//! operation anywhere in the crate.
//!
//! Node fields are crate-private. All mutation goes through
//! [`PropertyTree`](crate::tree::PropertyTree) so the tree invariants and
//! the revision counter cannot be bypassed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use credef_core::{ProjectId, PropertyId};

use crate::tree::PropertyTree;

// ─── Property Type ───────────────────────────────────────────────────

/// The closed set of property types a node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Free text.
    #[default]
    String,
    /// Whole number.
    Integer,
    /// Decimal number.
    Number,
    /// True/false flag.
    Boolean,
    /// Container of named child properties.
    Object,
    /// Container of exactly one item definition.
    Array,
}

impl PropertyType {
    /// Whether a node of this type may own children (`properties` or `items`).
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// The JSON Schema type keyword for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Constraints ─────────────────────────────────────────────────────

/// Optional validation constraints attached to a node.
///
/// Every field is independently optional. The model accepts combinations
/// that make no sense for the node's type (a `pattern` on a boolean); the
/// compiler decides what to emit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Number of decimal places allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
}

impl Constraints {
    /// Constraints carrying only a `format`.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Property Node ───────────────────────────────────────────────────

/// One entry of the credential attribute tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyNode {
    pub(crate) id: PropertyId,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(rename = "type", default)]
    pub(crate) property_type: PropertyType,
    #[serde(default)]
    pub(crate) required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) properties: Vec<PropertyNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) items: Option<Box<PropertyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) source_vocab_property_id: Option<String>,
}

impl PropertyNode {
    /// A fresh node with a new id, an empty name, and the given type.
    pub(crate) fn new(property_type: PropertyType) -> Self {
        Self {
            id: PropertyId::new(),
            name: String::new(),
            display_name: None,
            description: None,
            property_type,
            required: false,
            properties: Vec::new(),
            items: None,
            constraints: None,
            source_vocab_property_id: None,
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Whether the parent object lists this node in its `required` set.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Named children. Always empty unless the node is an `object`.
    pub fn properties(&self) -> &[PropertyNode] {
        &self.properties
    }

    /// The item definition. Only ever present on an `array` node, and may be
    /// absent there while the user is still editing.
    pub fn items(&self) -> Option<&PropertyNode> {
        self.items.as_deref()
    }

    pub fn constraints(&self) -> Option<&Constraints> {
        self.constraints.as_ref()
    }

    /// Identifier of the catalogued vocabulary property this node was
    /// imported from.
    pub fn source_vocab_property_id(&self) -> Option<&str> {
        self.source_vocab_property_id.as_deref()
    }

    /// Whether this node may own children.
    pub fn may_have_children(&self) -> bool {
        self.property_type.is_container()
    }

    /// Ids of this node and every descendant, depth-first.
    pub fn subtree_ids(&self) -> Vec<PropertyId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    pub(crate) fn collect_ids(&self, out: &mut Vec<PropertyId>) {
        out.push(self.id);
        for child in &self.properties {
            child.collect_ids(out);
        }
        if let Some(items) = &self.items {
            items.collect_ids(out);
        }
    }
}

// ─── Schema Metadata ─────────────────────────────────────────────────

/// Which artifact a project publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaMode {
    /// Flat JSON-LD term context.
    #[serde(rename = "jsonld-context")]
    JsonldContext,
    /// Nested JSON Schema.
    #[default]
    #[serde(rename = "json-schema")]
    JsonSchema,
}

impl SchemaMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonldContext => "jsonld-context",
            Self::JsonSchema => "json-schema",
        }
    }
}

impl std::fmt::Display for SchemaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jsonld-context" => Ok(Self::JsonldContext),
            "json-schema" => Ok(Self::JsonSchema),
            other => Err(format!(
                "unknown schema mode '{other}' (expected 'json-schema' or 'jsonld-context')"
            )),
        }
    }
}

/// Per-tree metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: SchemaMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Path leaf of the context URL. Only meaningful in `jsonld-context` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_name: Option<String>,
    /// Value of `additionalProperties` at every object level of the
    /// compiled schema. `false` is strict validation.
    #[serde(default = "default_additional_properties")]
    pub additional_properties: bool,
}

fn default_additional_properties() -> bool {
    true
}

impl SchemaMetadata {
    /// Metadata with a title and every other field at its default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Default for SchemaMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            mode: SchemaMode::default(),
            category: None,
            credential_name: None,
            additional_properties: default_additional_properties(),
        }
    }
}

// ─── Project ─────────────────────────────────────────────────────────

/// The unit of exchange with the persistence collaborator: one tree plus
/// its metadata, keyed by project id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProject {
    pub id: ProjectId,
    pub metadata: SchemaMetadata,
    #[serde(default)]
    pub properties: PropertyTree,
}

impl SchemaProject {
    /// A new project with zero top-level properties.
    pub fn new(metadata: SchemaMetadata) -> Self {
        Self {
            id: ProjectId::new(),
            metadata,
            properties: PropertyTree::new(),
        }
    }
}
