//! JSON-LD context pass.
//!
//! Flattens the tree into one term table. Only leaves contribute terms;
//! objects and arrays are walked through, so `address.city` and
//! `employees[].city` both define the single term `city`. The first leaf
//! to claim a name wins.
//!
//! ```json
//! {
//!   "@context": {
//!     "@version": 1.1,
//!     "@protected": true,
//!     "salary": "https://vocab.credef.dev/properties/vp-42",
//!     "nickname": "https://schemas.credef.dev/contexts/kyc/person#nickname"
//!   },
//!   "@id": "https://schemas.credef.dev/contexts/kyc/person"
//! }
//! ```

use serde_json::{Map, Value};

use crate::context_url::derive_context_url_with_base;
use crate::model::{PropertyNode, PropertyType, SchemaMetadata};
use crate::tree::PropertyTree;

use super::{child_path, items_path, CompileOptions, Compiled, CompilerWarning, WarningKind};

/// Compile a tree into a JSON-LD context document.
pub fn context_document(
    tree: &PropertyTree,
    metadata: &SchemaMetadata,
    options: &CompileOptions,
) -> Compiled {
    let url = derive_context_url_with_base(
        &options.context_base_url,
        &metadata.title,
        metadata.category.as_deref(),
        metadata.credential_name.as_deref(),
    );

    let mut terms = Map::new();
    terms.insert("@version".into(), Value::from(1.1));
    terms.insert("@protected".into(), Value::Bool(true));

    let mut pass = ContextPass {
        url: &url,
        vocabulary_base: &options.vocabulary_base_url,
        terms,
        warnings: Vec::new(),
    };
    for node in tree.properties() {
        pass.visit(node, &child_path("", node.name()));
    }

    let mut document = Map::new();
    document.insert("@context".into(), Value::Object(pass.terms));
    document.insert("@id".into(), Value::from(url.as_str()));

    Compiled {
        document: Value::Object(document),
        warnings: pass.warnings,
    }
}

struct ContextPass<'a> {
    url: &'a str,
    vocabulary_base: &'a str,
    terms: Map<String, Value>,
    warnings: Vec<CompilerWarning>,
}

impl ContextPass<'_> {
    fn warn(&mut self, node: &PropertyNode, path: &str, kind: WarningKind) {
        self.warnings.push(CompilerWarning {
            node_id: node.id(),
            path: path.to_string(),
            kind,
        });
    }

    fn visit(&mut self, node: &PropertyNode, path: &str) {
        match node.property_type() {
            PropertyType::Object => {
                for child in node.properties() {
                    self.visit(child, &child_path(path, child.name()));
                }
            }
            PropertyType::Array => match node.items() {
                Some(items) => self.visit(items, &items_path(path)),
                None => self.warn(node, path, WarningKind::MissingItems),
            },
            _ => self.term(node, path),
        }
    }

    fn term(&mut self, node: &PropertyNode, path: &str) {
        let name = node.name();
        if name.is_empty() {
            self.warn(node, path, WarningKind::EmptyName);
        }
        if self.terms.contains_key(name) {
            self.warn(node, path, WarningKind::DuplicateTerm);
            return;
        }
        let iri = self.term_iri(node);
        self.terms.insert(name.to_string(), Value::String(iri));
    }

    /// Catalogue-derived nodes keep their vocabulary identity. Everything
    /// else gets a fragment under the context URL.
    fn term_iri(&self, node: &PropertyNode) -> String {
        match node.source_vocab_property_id().filter(|s| !s.trim().is_empty()) {
            Some(source) if is_absolute_iri(source) => source.to_string(),
            Some(source) => format!("{}{}", self.vocabulary_base, source),
            None => format!("{}#{}", self.url, node.name()),
        }
    }
}

fn is_absolute_iri(value: &str) -> bool {
    value.contains("://") || value.starts_with("urn:")
}
