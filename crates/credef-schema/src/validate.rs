//! # Post-Compile Checks
//!
//! Structural checks on compiled documents before they are published.
//! These prove a document is well-formed for its format. They never
//! validate credential instance data against it.
//!
//! - [`check_schema_document`] builds a Draft 2020-12 validator from the
//!   schema with the `jsonschema` crate. A schema the crate refuses to
//!   compile is not publishable.
//! - [`check_context_document`] checks the JSON-LD envelope shape: a
//!   `@context` object whose terms are IRI strings, and an absolute `@id`.

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use thiserror::Error;

use credef_core::CredefError;

/// A compiled document that is not fit to publish.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaCheckError {
    /// The `jsonschema` crate could not build a validator from the schema.
    #[error("invalid JSON Schema: {reason}")]
    InvalidSchema { reason: String },

    /// The context document does not have the expected envelope.
    #[error("malformed context document at '{location}': {reason}")]
    MalformedContext { location: String, reason: String },
}

impl From<SchemaCheckError> for CredefError {
    fn from(err: SchemaCheckError) -> Self {
        CredefError::SchemaCheck(err.to_string())
    }
}

/// Compiled schemas are self-contained, so any `$ref` to another document
/// is refused rather than fetched.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external reference '{}' is not allowed", uri.as_str()).into())
    }
}

/// Prove that `schema` compiles as a Draft 2020-12 JSON Schema.
pub fn check_schema_document(schema: &Value) -> Result<(), SchemaCheckError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(OfflineRetriever);
    opts.build(schema)
        .map(|_| ())
        .map_err(|e| SchemaCheckError::InvalidSchema {
            reason: e.to_string(),
        })
}

/// Check the envelope of a JSON-LD context document.
pub fn check_context_document(document: &Value) -> Result<(), SchemaCheckError> {
    let malformed = |location: &str, reason: &str| SchemaCheckError::MalformedContext {
        location: location.to_string(),
        reason: reason.to_string(),
    };

    let id = document
        .get("@id")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("@id", "missing or not a string"))?;
    if !id.contains("://") {
        return Err(malformed("@id", "not an absolute URL"));
    }

    let context = document
        .get("@context")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("@context", "missing or not an object"))?;

    for (term, value) in context {
        if term.starts_with('@') {
            continue;
        }
        let iri = value
            .as_str()
            .ok_or_else(|| malformed(term, "term definition is not an IRI string"))?;
        if iri.is_empty() {
            return Err(malformed(term, "term IRI is empty"));
        }
    }
    Ok(())
}
