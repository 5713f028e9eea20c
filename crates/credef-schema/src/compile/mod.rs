//! # Dual-Format Compiler
//!
//! Two independent, read-only passes over a [`PropertyTree`]:
//!
//! - [`validation::validation_schema`] produces a nested JSON Schema
//!   (`type`, `properties`, `required`, `additionalProperties`, recursively).
//! - [`context::context_document`] produces a flat JSON-LD term table
//!   identified by the derived context URL.
//!
//! Both passes are total. A tree mid-edit (empty names, arrays without an
//! item definition, duplicate sibling names) still compiles; the problems
//! come back as [`CompilerWarning`]s next to the document.
//!
//! [`PropertyTree`]: crate::tree::PropertyTree

pub mod context;
pub mod validation;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use credef_core::{sha256_digest, CanonicalBytes, ContentDigest, CredefError, PropertyId};

use crate::context_url::DEFAULT_CONTEXT_BASE_URL;
use crate::validate::{check_context_document, check_schema_document};
use crate::model::{SchemaMode, SchemaProject};

pub use context::context_document;
pub use validation::validation_schema;

/// Prefix for term IRIs of nodes imported with a bare catalogue id.
pub const DEFAULT_VOCABULARY_BASE_URL: &str = "https://vocab.credef.dev/properties/";

/// Deployment-specific URL namespaces used while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Namespace the context URL is derived under.
    pub context_base_url: String,
    /// Prefix joined to relative `sourceVocabPropertyId` values.
    pub vocabulary_base_url: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            context_base_url: DEFAULT_CONTEXT_BASE_URL.to_string(),
            vocabulary_base_url: DEFAULT_VOCABULARY_BASE_URL.to_string(),
        }
    }
}

// ─── Warnings ────────────────────────────────────────────────────────

/// Why a node compiled to something degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The node has no name and compiled under the empty key.
    EmptyName,
    /// A sibling with the same name came first; this node was left out.
    DuplicateName,
    /// An array has no item definition; no `items` keyword was emitted.
    MissingItems,
    /// A leaf elsewhere in the tree already claimed this term.
    DuplicateTerm,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EmptyName => "property has an empty name",
            Self::DuplicateName => "duplicate sibling name, later property omitted",
            Self::MissingItems => "array has no item definition",
            Self::DuplicateTerm => "duplicate context term, later property omitted",
        };
        f.write_str(message)
    }
}

/// One semantically incomplete node found during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerWarning {
    pub node_id: PropertyId,
    /// Dotted name path from the top level; `[]` marks an array's items.
    pub path: String,
    pub kind: WarningKind,
}

impl std::fmt::Display for CompilerWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' ({}): {}", self.path, self.node_id, self.kind)
    }
}

/// Output of one compiler pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub document: Value,
    pub warnings: Vec<CompilerWarning>,
}

pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

pub(crate) fn items_path(array_path: &str) -> String {
    format!("{array_path}[]")
}

// ─── Project Compilation ─────────────────────────────────────────────

/// A compiled document ready to publish, with its content digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledArtifact {
    pub mode: SchemaMode,
    pub document: Value,
    pub warnings: Vec<CompilerWarning>,
    /// SHA-256 over the JCS-canonical document bytes.
    pub digest: ContentDigest,
}

/// Compile a project in the mode its metadata selects.
pub fn compile_project(
    project: &SchemaProject,
    options: &CompileOptions,
) -> Result<CompiledArtifact, CredefError> {
    compile_project_as(project, project.metadata.mode, options)
}

/// Compile a project in an explicit mode, ignoring `metadata.mode`.
pub fn compile_project_as(
    project: &SchemaProject,
    mode: SchemaMode,
    options: &CompileOptions,
) -> Result<CompiledArtifact, CredefError> {
    let Compiled { document, warnings } = match mode {
        SchemaMode::JsonSchema => validation_schema(&project.properties, &project.metadata),
        SchemaMode::JsonldContext => {
            context_document(&project.properties, &project.metadata, options)
        }
    };
    let digest = sha256_digest(&CanonicalBytes::new(&document)?);

    tracing::debug!(
        project = %project.id,
        %mode,
        %digest,
        warnings = warnings.len(),
        "project compiled"
    );

    Ok(CompiledArtifact {
        mode,
        document,
        warnings,
        digest,
    })
}

/// Compile in an explicit mode and refuse a document that fails the
/// well-formedness check for that mode.
pub fn compile_checked_as(
    project: &SchemaProject,
    mode: SchemaMode,
    options: &CompileOptions,
) -> Result<CompiledArtifact, CredefError> {
    let artifact = compile_project_as(project, mode, options)?;
    match mode {
        SchemaMode::JsonSchema => check_schema_document(&artifact.document)?,
        SchemaMode::JsonldContext => check_context_document(&artifact.document)?,
    }
    Ok(artifact)
}
